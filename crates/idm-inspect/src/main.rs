//! Builds a wrapper tree from a JSON bundle and prints it.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use idm_schema::{PrismObject, ResourceEntry, ResourceRegistry, SchemaRegistry};
use idm_wrapper::{EditSession, ObjectStatus, ObjectWrapper, Services, SessionOptions};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Schema, resources and the object to wrap
#[derive(Debug, Deserialize)]
struct Bundle {
    schema: SchemaRegistry,
    #[serde(default)]
    resources: IndexMap<String, ResourceEntry>,
    object: PrismObject,
}

impl Bundle {
    fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("bundle is not valid JSON")
    }

    fn wrap(self, session: EditSession) -> Result<ObjectWrapper> {
        let resources = ResourceRegistry::from_entries(self.resources);
        let wrapper = ObjectWrapper::new(self.object, session, Services::new(&self.schema, &resources))
            .context("failed to build wrapper tree")?;
        Ok(wrapper)
    }
}

fn cli() -> Command {
    Command::new("idm-inspect")
        .version(idm_wrapper::VERSION)
        .about("Build an editable wrapper tree and print it with its change set")
        .arg(
            Arg::new("bundle")
                .long("bundle")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON file holding schema, resources and object"),
        )
        .arg(
            Arg::new("status")
                .long("status")
                .default_value("modifying")
                .value_parser(value_parser!(ObjectStatus))
                .help("Edit status: adding or modifying"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with session options"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the change set as JSON"),
        )
}

fn session_options(matches: &ArgMatches) -> Result<SessionOptions> {
    let Some(path) = matches.get_one::<PathBuf>("config") else {
        return Ok(SessionOptions::default());
    };
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    SessionOptions::from_toml_str(&raw).with_context(|| format!("invalid session options in {}", path.display()))
}

fn run(matches: &ArgMatches) -> Result<()> {
    let bundle_path = matches
        .get_one::<PathBuf>("bundle")
        .context("--bundle is required")?;
    let status = matches
        .get_one::<ObjectStatus>("status")
        .copied()
        .unwrap_or(ObjectStatus::Modifying);
    let session = EditSession::new(status).with_options(session_options(matches)?);

    let raw = std::fs::read_to_string(bundle_path)
        .with_context(|| format!("failed to read {}", bundle_path.display()))?;
    let wrapper = Bundle::parse(&raw)?.wrap(session)?;
    tracing::info!(containers = wrapper.containers().len(), "Built wrapper tree");

    let delta = wrapper.compute_delta();
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&delta)?);
    } else {
        print!("{}", wrapper.debug_dump());
        println!();
        println!("{delta}");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    run(&cli().get_matches())
}

#[cfg(test)]
mod tests {
    use super::*;
    use idm_schema::ItemPath;
    use pretty_assertions::assert_eq;

    const JACK: &str = include_str!("../fixtures/jack.json");
    const OPTIONS: &str = include_str!("../fixtures/options.toml");

    #[test]
    fn fixture_bundle_builds() {
        let wrapper = Bundle::parse(JACK).unwrap().wrap(EditSession::modifying()).unwrap();

        let paths: Vec<String> = wrapper.containers().iter().map(|c| c.path().to_string()).collect();
        assert_eq!(paths, vec!["", "activation"]);
        let names: Vec<&str> = wrapper
            .main_container()
            .visible_items()
            .map(|item| item.name().as_str())
            .collect();
        assert_eq!(names, vec!["name", "fullName", "employeeNumber"]);

        let activation = wrapper
            .find_container_wrapper(&ItemPath::single("activation"))
            .unwrap();
        assert_eq!(activation.items().len(), 1);
        assert!(wrapper.compute_delta().is_empty());
    }

    #[test]
    fn fixture_options_show_empty_fields() {
        let options = SessionOptions::from_toml_str(OPTIONS).unwrap();
        let wrapper = Bundle::parse(JACK)
            .unwrap()
            .wrap(EditSession::modifying().with_options(options))
            .unwrap();
        assert!(wrapper
            .main_container()
            .visible_items()
            .any(|item| item.name().as_str() == "emailAddress"));
    }

    #[test]
    fn dump_names_the_object() {
        let wrapper = Bundle::parse(JACK).unwrap().wrap(EditSession::modifying()).unwrap();
        let dump = wrapper.debug_dump();
        assert!(dump.starts_with("ObjectWrapper(UserType c0c010c0-d34d-b33f-f00d-111111111111 jack, MODIFYING)"));
        assert!(dump.contains("Full name"));
    }

    #[test]
    fn malformed_bundle_is_reported() {
        let err = Bundle::parse("{\"schema\": []}").unwrap_err();
        assert!(err.to_string().contains("bundle is not valid JSON"));
    }

    #[test]
    fn cli_parses_status() {
        let matches = cli()
            .try_get_matches_from(["idm-inspect", "--bundle", "jack.json", "--status", "adding", "--json"])
            .unwrap();
        assert_eq!(matches.get_one::<ObjectStatus>("status"), Some(&ObjectStatus::Adding));
        assert!(matches.get_flag("json"));
    }
}
