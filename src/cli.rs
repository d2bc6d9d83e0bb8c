use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

/// Filter flags of the project commands, as (argument id, long flag, help).
pub(crate) const PROJECT_FILTERS: [(&str, &str, &str); 11] = [
    ("uri", "uri", "Only the project with this URI"),
    ("name", "name", "Name contains (case-insensitive)"),
    ("acronym", "acronym", "Acronym contains (case-insensitive)"),
    ("subproject_type", "subproject-type", "Subproject type contains"),
    ("financial_support", "financial-support", "Financial support contains"),
    ("financial_name", "financial-name", "Financial reference contains"),
    ("date_start", "date-start", "Start date equals (YYYY-MM-DD)"),
    ("date_end", "date-end", "End date equals (YYYY-MM-DD)"),
    ("keyword", "keyword", "Some keyword contains"),
    ("parent_project", "parent-project", "Parent project URI"),
    ("website", "website", "Website URL"),
];

pub(crate) fn command() -> Command {
    Command::new("triplestore-access")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Query and update a SPARQL triplestore repository")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Sets a custom config file (.toml format)"),
        )
        .arg(
            Arg::new("repository")
                .short('r')
                .long("repository")
                .value_name("ID")
                .global(true)
                .help("Use another repository of the configured server"),
        )
        .subcommand(Command::new("health").about("Open the repository and report its backend"))
        .subcommand(
            Command::new("exists")
                .about("Whether a triple matching the pattern, or the identifier, is stored")
                .arg(term_arg("subject"))
                .arg(term_arg("predicate"))
                .arg(term_arg("object"))
                .arg(
                    Arg::new("identifier")
                        .long("identifier")
                        .value_name("URI")
                        .conflicts_with_all(["subject", "predicate", "object"])
                        .help("Look for the URI as subject, predicate or object"),
                ),
        )
        .subcommand(
            Command::new("lookup")
                .about("One value of the predicate for the subject")
                .arg(term_arg("subject"))
                .arg(term_arg("predicate")),
        )
        .subcommand(relationship_command(
            "add",
            "Insert one triple per object in a single transaction",
        ))
        .subcommand(relationship_command(
            "remove",
            "Delete the triples, only if every one of them is stored",
        ))
        .subcommand(
            Command::new("count-projects")
                .about("Number of projects matching the filters")
                .args(project_filter_args()),
        )
        .subcommand(
            Command::new("list-projects")
                .about("One page of projects matching the filters")
                .args(project_filter_args())
                .arg(
                    Arg::new("page")
                        .long("page")
                        .value_name("N")
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .help("Zero-based page"),
                )
                .arg(
                    Arg::new("page_size")
                        .long("page-size")
                        .value_name("N")
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .help("Projects per page"),
                ),
        )
        .subcommand(projects_file_command(
            "insert-projects",
            "Create the projects of a JSON array file",
        ))
        .subcommand(projects_file_command(
            "update-projects",
            "Replace the properties of the projects of a JSON array file",
        ))
}

/// Value of a global argument, wherever it was given on the command line.
pub(crate) fn global_arg<'a>(matches: &'a ArgMatches, id: &str) -> Option<&'a str> {
    matches
        .subcommand()
        .and_then(|(_, args)| args.get_one::<String>(id))
        .or_else(|| matches.get_one::<String>(id))
        .map(String::as_str)
}

fn term_arg(id: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name("TERM")
        .help("IRI, \"literal\" or ?variable")
}

fn relationship_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(Arg::new("subject").required(true).value_name("SUBJECT"))
        .arg(Arg::new("predicate").required(true).value_name("PREDICATE"))
        .arg(
            Arg::new("objects")
                .required(true)
                .value_name("OBJECT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("graph")
                .short('g')
                .long("graph")
                .value_name("IRI")
                .help("Named graph of the triples"),
        )
}

fn project_filter_args() -> Vec<Arg> {
    PROJECT_FILTERS
        .iter()
        .map(|(id, long, help)| Arg::new(*id).long(*long).value_name("VALUE").help(*help))
        .collect()
}

fn projects_file_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(Arg::new("file").required(true).value_name("FILE"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn global_arguments_after_the_subcommand() {
        let matches = command()
            .try_get_matches_from([
                "triplestore-access",
                "add",
                "http://example.org/s",
                "http://example.org/p",
                "http://example.org/o1",
                "http://example.org/o2",
                "--config",
                "store.toml",
                "-r",
                "other",
            ])
            .unwrap();

        assert_eq!(global_arg(&matches, "config"), Some("store.toml"));
        assert_eq!(global_arg(&matches, "repository"), Some("other"));
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "add");
        let objects: Vec<&String> = args.get_many::<String>("objects").unwrap().collect();
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn identifier_excludes_pattern_terms() {
        let result = command().try_get_matches_from([
            "triplestore-access",
            "exists",
            "--identifier",
            "http://example.org/s",
            "--subject",
            "http://example.org/s",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn negative_page_is_accepted() {
        let matches = command()
            .try_get_matches_from(["triplestore-access", "list-projects", "--page", "-1"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<i64>("page"), Some(&-1));
    }
}
