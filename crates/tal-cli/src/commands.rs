use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use colored::Colorize;
use serde_json::{json, Value};

use tal_registry::{CallerContext, RegistryError, TalentRegistry};
use tal_server::{ServerConfig, StoreConfig, TalServer};
use tal_store::FileTalentStore;
use tal_types::{CallerId, ProfileSubmission};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        format,
        store,
        caller,
        ..
    } = cli;

    if let Command::Serve(args) = command {
        return cmd_serve(args, store);
    }

    let session = Session::open(&store, caller.as_deref())?;
    let output = session.execute(command).map_err(with_code)?;
    match format {
        OutputFormat::Text => println!("{}", output.text),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output.json)?),
    }
    Ok(())
}

/// Prefix registry errors with their numeric code.
fn with_code(err: anyhow::Error) -> anyhow::Error {
    match err.downcast_ref::<RegistryError>() {
        Some(e) => anyhow!("[{}] {}", e.code(), e),
        None => err,
    }
}

/// Rendered result of a command, in both output formats.
#[derive(Debug)]
pub struct Output {
    pub text: String,
    pub json: Value,
}

impl Output {
    fn new(text: impl Into<String>, json: Value) -> Self {
        Self {
            text: text.into(),
            json,
        }
    }
}

/// The CLI acting as the registry's execution environment: one file-backed
/// registry and the local principal every write runs as.
pub struct Session {
    registry: TalentRegistry,
    caller: Option<CallerId>,
}

impl Session {
    pub fn open(store: &Path, caller: Option<&str>) -> anyhow::Result<Self> {
        let store = FileTalentStore::open(store)
            .with_context(|| format!("opening talent store {}", store.display()))?;
        Ok(Self {
            registry: TalentRegistry::new(Arc::new(store)),
            caller: caller.map(CallerId::principal),
        })
    }

    fn context(&self) -> anyhow::Result<CallerContext> {
        self.caller
            .clone()
            .map(CallerContext::authenticated)
            .ok_or_else(|| anyhow!("--caller is required for this command"))
    }

    fn target(&self, args: &ReadArgs) -> anyhow::Result<CallerId> {
        match (&args.id, &self.caller) {
            (Some(hex), _) => Ok(CallerId::from_hex(hex)?),
            (None, Some(own)) => Ok(own.clone()),
            (None, None) => Err(anyhow!("pass --id or --caller to choose whose profile to read")),
        }
    }

    pub fn execute(&self, command: Command) -> anyhow::Result<Output> {
        let r = &self.registry;
        Ok(match command {
            Command::Create(args) => {
                let ctx = self.context()?;
                let confirmation = r.create(&ctx, submission(args)?)?;
                confirmed(confirmation.message(), ctx.caller())
            }
            Command::Modify(args) => {
                let ctx = self.context()?;
                let confirmation = r.modify(&ctx, submission(args)?)?;
                confirmed(confirmation.message(), ctx.caller())
            }
            Command::Show(args) => {
                let record = r.fetch_record(&self.target(&args)?)?;
                let text = format!(
                    "{}\n  Region: {}\n  Expertise: {}\n  Capacity: {} h/week",
                    record.personal_identifier().as_str().bold(),
                    record.base_region(),
                    record.expertise_areas().labels().join(", "),
                    record.weekly_capacity(),
                );
                Output::new(text, serde_json::to_value(&record)?)
            }
            Command::Identifier(args) => {
                let identifier = r.fetch_identifier(&self.target(&args)?)?;
                Output::new(identifier.as_str(), json!({ "identifier": identifier }))
            }
            Command::Region(args) => {
                let region = r.fetch_region(&self.target(&args)?)?;
                Output::new(region.as_str(), json!({ "region": region }))
            }
            Command::Expertise(args) => {
                let expertise = r.fetch_expertise(&self.target(&args)?)?;
                Output::new(expertise.labels().join("\n"), serde_json::to_value(&expertise)?)
            }
            Command::Capacity(args) => {
                let capacity = r.fetch_capacity(&self.target(&args)?)?;
                Output::new(capacity.to_string(), json!({ "capacity": capacity }))
            }
            Command::CountExpertise(args) => {
                let count = r.count_expertise(&self.target(&args)?)?;
                Output::new(count.to_string(), json!({ "count": count }))
            }
            Command::ExpertiseNonempty(args) => {
                let nonempty = r.validate_expertise_nonempty(&self.target(&args)?)?;
                Output::new(nonempty.to_string(), json!({ "nonempty": nonempty }))
            }
            Command::Exists(args) => {
                let exists = r.exists(&self.target(&args)?)?;
                Output::new(exists.to_string(), json!({ "exists": exists }))
            }
            Command::Status(args) => {
                let status = r.registration_status(&self.target(&args)?)?;
                Output::new(status.as_str(), json!({ "status": status.as_str() }))
            }
            Command::Summary(args) => {
                let summary = r.summary(&self.target(&args)?)?;
                let text = format!(
                    "{} ({}) — {} expertise area(s)",
                    summary.identifier.as_str().bold(),
                    summary.region,
                    summary.expertise_count
                );
                Output::new(text, serde_json::to_value(&summary)?)
            }
            Command::RegionExpertise(args) => {
                let view = r.region_and_expertise(&self.target(&args)?)?;
                let text = format!("{}: {}", view.region, view.expertise.labels().join(", "));
                Output::new(text, serde_json::to_value(&view)?)
            }
            Command::Profile(args) => {
                let profile = r.full_profile(&self.target(&args)?)?;
                let text = format!(
                    "identifier: {}\nregion: {}\nexpertise: {}\ncapacity: {}",
                    profile.identifier,
                    profile.region,
                    profile.expertise.labels().join(", "),
                    profile.capacity
                );
                Output::new(text, serde_json::to_value(&profile)?)
            }
            Command::Whoami => {
                let ctx = self.context()?;
                Output::new(ctx.caller().to_hex(), json!({ "caller": ctx.caller() }))
            }
            Command::Serve(_) => return Err(anyhow!("serve is not a registry operation")),
        })
    }
}

fn submission(args: ProfileArgs) -> anyhow::Result<ProfileSubmission> {
    Ok(ProfileSubmission::from_parts(
        &args.identifier,
        &args.region,
        args.expertise,
        args.capacity,
    )?)
}

fn confirmed(message: &str, caller: &CallerId) -> Output {
    Output::new(
        format!("{} {}\n  Caller: {}", "✓".green().bold(), message, caller.short_id().cyan()),
        json!({ "message": message, "caller": caller }),
    )
}

fn cmd_serve(args: ServeArgs, store: PathBuf) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading server config {}", path.display()))?,
        None => ServerConfig {
            store: StoreConfig::File { path: store },
            ..Default::default()
        },
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid bind address {bind}"))?;
    }

    println!("Talent Ledger server on {}", config.bind_addr.to_string().bold());
    let server = TalServer::from_config(config)?;
    tokio::runtime::Runtime::new()?.block_on(server.serve())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(dir: &tempfile::TempDir, caller: Option<&str>) -> Session {
        Session::open(&dir.path().join("registry.json"), caller).unwrap()
    }

    fn profile(identifier: &str, expertise: &[&str], capacity: u64) -> ProfileArgs {
        ProfileArgs {
            identifier: identifier.into(),
            region: "Berlin".into(),
            expertise: expertise.iter().map(|s| s.to_string()).collect(),
            capacity,
        }
    }

    fn own() -> ReadArgs {
        ReadArgs { id: None }
    }

    fn registry_code(err: &anyhow::Error) -> Option<u32> {
        err.downcast_ref::<RegistryError>().map(RegistryError::code)
    }

    #[test]
    fn create_persists_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let out = session(&dir, Some("ada"))
            .execute(Command::Create(profile("Ada", &["math"], 10)))
            .unwrap();
        assert_eq!(out.json["message"], "Talent profile registered");

        let later = session(&dir, Some("ada"));
        let out = later.execute(Command::Capacity(own())).unwrap();
        assert_eq!(out.text, "10");
    }

    #[test]
    fn writes_require_a_caller() {
        let dir = tempfile::tempdir().unwrap();
        let err = session(&dir, None)
            .execute(Command::Create(profile("Ada", &["math"], 10)))
            .unwrap_err();
        assert!(err.to_string().contains("--caller"));
    }

    #[test]
    fn registry_errors_keep_their_codes() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(&dir, Some("ada"));

        let err = s.execute(Command::Modify(profile("Ada", &["x"], 1))).unwrap_err();
        assert_eq!(registry_code(&err), Some(404));

        let err = s.execute(Command::Create(profile("Ada", &[], 1))).unwrap_err();
        assert_eq!(registry_code(&err), Some(400));

        s.execute(Command::Create(profile("Ada", &["x"], 1))).unwrap();
        let err = s.execute(Command::Create(profile("Ada", &["x"], 1))).unwrap_err();
        assert_eq!(registry_code(&err), Some(409));
        assert_eq!(with_code(err).to_string(), "[409] duplicate entry");
    }

    #[test]
    fn reads_other_identities_by_id() {
        let dir = tempfile::tempdir().unwrap();
        session(&dir, Some("ada"))
            .execute(Command::Create(profile("Ada", &["math", "logic"], 10)))
            .unwrap();

        let reader = session(&dir, None);
        let id = CallerId::principal("ada").to_hex();
        let out = reader
            .execute(Command::Summary(ReadArgs { id: Some(id.clone()) }))
            .unwrap();
        assert_eq!(out.json["expertise_count"], 2);

        let out = reader
            .execute(Command::Expertise(ReadArgs { id: Some(id) }))
            .unwrap();
        assert_eq!(out.text, "math\nlogic");
    }

    #[test]
    fn sessions_open_at_the_same_time_keep_both_records() {
        let dir = tempfile::tempdir().unwrap();
        let ada = session(&dir, Some("ada"));
        let bob = session(&dir, Some("bob"));

        ada.execute(Command::Create(profile("Ada", &["math"], 10))).unwrap();
        bob.execute(Command::Create(profile("Bob", &["art"], 5))).unwrap();

        let err = session(&dir, Some("ada"))
            .execute(Command::Create(profile("Ada again", &["x"], 1)))
            .unwrap_err();
        assert_eq!(registry_code(&err), Some(409));

        let reader = session(&dir, None);
        for name in ["ada", "bob"] {
            let id = CallerId::principal(name).to_hex();
            let out = reader.execute(Command::Exists(ReadArgs { id: Some(id) })).unwrap();
            assert_eq!(out.text, "true", "{name}");
        }
    }

    #[test]
    fn status_of_unregistered_caller() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(&dir, Some("nobody"));
        assert_eq!(s.execute(Command::Status(own())).unwrap().text, "Not Registered");
        assert_eq!(s.execute(Command::Exists(own())).unwrap().text, "false");
        let err = s.execute(Command::Show(own())).unwrap_err();
        assert_eq!(registry_code(&err), Some(404));
    }

    #[test]
    fn modify_replaces_expertise() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(&dir, Some("ada"));
        s.execute(Command::Create(profile("A", &["x", "y"], 10))).unwrap();
        s.execute(Command::Modify(profile("B", &["z"], 20))).unwrap();

        let out = s.execute(Command::Expertise(own())).unwrap();
        assert_eq!(out.json, json!(["z"]));
    }

    #[test]
    fn reads_need_an_id_or_caller() {
        let dir = tempfile::tempdir().unwrap();
        assert!(session(&dir, None).execute(Command::Show(own())).is_err());
    }

    #[test]
    fn whoami_matches_principal_derivation() {
        let dir = tempfile::tempdir().unwrap();
        let out = session(&dir, Some("ada")).execute(Command::Whoami).unwrap();
        assert_eq!(out.text, CallerId::principal("ada").to_hex());
    }
}
