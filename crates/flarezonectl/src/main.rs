// # flarezonectl
//
// Thin command-line front end over the flarezone object model. All zone,
// record and settings logic lives in `flarezone-core`; this binary only:
// 1. Reads configuration from flags and environment variables
// 2. Initializes logging
// 3. Builds the Cloudflare service factory
// 4. Runs one command against the account
//
// ## Configuration
//
// - `FLAREZONE_EMAIL` / `FLAREZONE_API_KEY`: account credentials
// - `FLAREZONE_HOST_KEY`: host key (host zone provisioning, user lookup)
// - `FLAREZONE_API_BASE`, `FLAREZONE_HOST_API_URL`: endpoint overrides
// - `FLAREZONE_TIMEOUT_SECS`: HTTP timeout
// - `FLAREZONE_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export FLAREZONE_EMAIL=ops@example.com
// export FLAREZONE_API_KEY=your_key
//
// flarezonectl records example.com
// flarezonectl add-record example.com www A 192.0.2.10 --ttl 300
// flarezonectl set-setting example.com always_use_https '"on"'
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flarezone_cloudflare::CloudflareFactory;
use flarezone_core::{
    Account, Credentials, NewRecord, NewZone, Record, ServiceConfig, ServiceFactory, UserQuery,
    Zone,
};
use serde_json::Value;
use std::process::ExitCode;
use std::rc::Rc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CtlExitCode {
    /// Command completed
    Success = 0,
    /// Configuration error
    ConfigError = 1,
    /// Command failed
    RuntimeError = 2,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Manage Cloudflare zones, DNS records and zone settings
#[derive(Parser)]
#[command(name = "flarezonectl", version, about, long_about = None)]
struct Cli {
    /// Account email
    #[arg(long, env = "FLAREZONE_EMAIL")]
    email: Option<String>,

    /// Account global API key
    #[arg(long, env = "FLAREZONE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Host key for host API operations
    #[arg(long, env = "FLAREZONE_HOST_KEY", hide_env_values = true)]
    host_key: Option<String>,

    /// Client API base URL
    #[arg(long, env = "FLAREZONE_API_BASE", default_value = flarezone_core::config::DEFAULT_API_BASE)]
    api_base: String,

    /// Host gateway URL
    #[arg(long, env = "FLAREZONE_HOST_API_URL", default_value = flarezone_core::config::DEFAULT_HOST_API_URL)]
    host_api_url: String,

    /// HTTP timeout in seconds
    #[arg(long, env = "FLAREZONE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "FLAREZONE_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the account's zones
    Zones,

    /// List a zone's DNS records grouped by name
    Records {
        /// Zone name
        zone: String,
    },

    /// Create a DNS record
    AddRecord {
        /// Zone name
        zone: String,
        /// Record name
        name: String,
        /// Record type (A, AAAA, CNAME, MX, TXT, ...)
        record_type: String,
        /// Record content
        content: String,
        /// TTL in seconds (1 = automatic)
        #[arg(long, default_value_t = 1)]
        ttl: u32,
        /// Proxy traffic through Cloudflare
        #[arg(long)]
        proxied: bool,
        /// Priority (MX records only)
        #[arg(long, default_value_t = 10)]
        priority: u16,
    },

    /// Change fields of a DNS record
    UpdateRecord {
        /// Zone name
        zone: String,
        /// Record id
        record_id: String,
        /// Assignments as field=value (value parsed as JSON when possible)
        #[arg(required = true, value_parser = parse_assignment)]
        fields: Vec<(String, Value)>,
    },

    /// Delete a DNS record
    DeleteRecord {
        /// Zone name
        zone: String,
        /// Record id
        record_id: String,
    },

    /// Show a zone's settings
    Settings {
        /// Zone name
        zone: String,
    },

    /// Change a zone setting
    SetSetting {
        /// Zone name
        zone: String,
        /// Setting id
        id: String,
        /// New value (parsed as JSON when possible)
        value: String,
    },

    /// Create a zone
    CreateZone {
        /// Zone name
        name: String,
        /// Provision through the host API (purges host-seeded records)
        #[arg(long)]
        host: bool,
        /// Import existing records
        #[arg(long)]
        jump_start: bool,
        /// Owning organization id
        #[arg(long, conflicts_with = "host")]
        organization: Option<String>,
    },

    /// Delete a zone
    DeleteZone {
        /// Zone name
        zone: String,
    },

    /// Look up an account through the host API
    LookupUser {
        /// Account email
        #[arg(long, conflicts_with = "unique_id", required_unless_present = "unique_id")]
        by_email: Option<String>,
        /// Host-side identifier
        #[arg(long)]
        unique_id: Option<String>,
    },
}

impl Cli {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            api_base: self.api_base.clone(),
            host_api_url: self.host_api_url.clone(),
            host_key: self.host_key.clone(),
            timeout_secs: self.timeout_secs,
            per_page: 50,
        }
    }

    /// Credentials for commands acting as an account; `None` for host-only commands
    fn account_credentials(&self) -> Result<Option<Credentials>> {
        match self.command {
            Command::LookupUser { .. } => Ok(None),
            _ => self.credentials().map(Some),
        }
    }

    fn credentials(&self) -> Result<Credentials> {
        let email = self
            .email
            .clone()
            .context("FLAREZONE_EMAIL is required. Set it via: export FLAREZONE_EMAIL=you@example.com")?;
        let api_key = self
            .api_key
            .clone()
            .context("FLAREZONE_API_KEY is required. Set it via: export FLAREZONE_API_KEY=your_key")?;
        let credentials = Credentials::new(email, api_key);
        credentials.validate()?;
        Ok(credentials)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let factory = match CloudflareFactory::new(cli.service_config()) {
        Ok(factory) => Rc::new(factory),
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    let credentials = match resolve_credentials(&cli) {
        Ok(credentials) => credentials,
        Err(code) => return code.into(),
    };

    match run(&cli, factory, credentials) {
        Ok(()) => CtlExitCode::Success.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            CtlExitCode::RuntimeError.into()
        }
    }
}

/// Resolve account credentials, reporting failures as configuration errors
fn resolve_credentials(cli: &Cli) -> std::result::Result<Option<Credentials>, CtlExitCode> {
    cli.account_credentials().map_err(|e| {
        eprintln!("Configuration validation error: {:#}", e);
        CtlExitCode::ConfigError
    })
}

fn run(
    cli: &Cli,
    factory: Rc<dyn ServiceFactory>,
    credentials: Option<Credentials>,
) -> Result<()> {
    let account = || -> Result<Account> {
        let credentials = credentials
            .clone()
            .context("Account credentials are required for this command")?;
        Ok(Account::new(Rc::clone(&factory), credentials)?)
    };

    match &cli.command {
        Command::Zones => {
            for zone in account()?.zones()? {
                println!(
                    "{}\t{}\t{}",
                    zone.id(),
                    zone,
                    zone.status().unwrap_or_default()
                );
            }
        }
        Command::Records { zone } => {
            let zone = account()?.zone_by_name(zone)?;
            for (name, records) in zone.records()? {
                println!("{}", name);
                for record in records {
                    println!("  {}\t{}", record.id()?, record);
                }
            }
        }
        Command::AddRecord {
            zone,
            name,
            record_type,
            content,
            ttl,
            proxied,
            priority,
        } => {
            let zone = account()?.zone_by_name(zone)?;
            let record = zone.create_record(
                &NewRecord::new(name.as_str(), record_type.as_str(), content.as_str())
                    .with_ttl(*ttl)
                    .with_proxied(*proxied)
                    .with_priority(*priority),
            )?;
            println!("{}\t{}", record.id()?, record);
        }
        Command::UpdateRecord {
            zone,
            record_id,
            fields,
        } => {
            let zone = account()?.zone_by_name(zone)?;
            let record = find_record(&zone, record_id)?;
            for (field, value) in fields {
                record.set(field, value.clone())?;
            }
            record.save()?;
            println!("{}\t{}", record.id()?, record);
        }
        Command::DeleteRecord { zone, record_id } => {
            let zone = account()?.zone_by_name(zone)?;
            find_record(&zone, record_id)?.delete()?;
            println!("Deleted record {}", record_id);
        }
        Command::Settings { zone } => {
            let settings = account()?.zone_by_name(zone)?.settings()?;
            for id in &settings {
                let marker = if settings.is_editable(&id)? { "" } else { " (read-only)" };
                println!("{} = {}{}", id, settings.get(&id)?, marker);
            }
        }
        Command::SetSetting { zone, id, value } => {
            let settings = account()?.zone_by_name(zone)?.settings()?;
            settings.set(id, parse_value(value))?;
            settings.save()?;
            println!("{} = {}", id, settings.get(id)?);
        }
        Command::CreateZone {
            name,
            host,
            jump_start,
            organization,
        } => {
            let account = account()?;
            let zone = if *host {
                account.create_host_zone(name, *jump_start)?
            } else {
                account.create_zone(
                    &NewZone::new(name.as_str())
                        .with_jump_start(*jump_start)
                        .with_organization(organization.clone()),
                )?
            };
            println!("{}\t{}\t{}", zone.id(), zone, zone.status().unwrap_or_default());
        }
        Command::DeleteZone { zone } => {
            let zone = account()?.zone_by_name(zone)?;
            zone.delete()?;
            println!("Deleted zone {}", zone);
        }
        Command::LookupUser {
            by_email,
            unique_id,
        } => {
            let query = match (by_email, unique_id) {
                (Some(email), _) => UserQuery::Email(email.clone()),
                (None, Some(id)) => UserQuery::UniqueId(id.clone()),
                (None, None) => anyhow::bail!("Either --by-email or --unique-id is required"),
            };
            let account = Account::lookup(Rc::clone(&factory), &query)?;
            println!("{}", serde_json::to_string_pretty(&account.profile()?)?);
        }
    }

    Ok(())
}

fn find_record(zone: &Zone, record_id: &str) -> Result<Record> {
    for record in zone.iter_records() {
        let record = record?;
        if record.id()? == record_id {
            return Ok(record);
        }
    }
    anyhow::bail!("Record {} not found in zone {}", record_id, zone)
}

/// Parse a value as JSON, falling back to a plain string
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parse a `field=value` assignment
fn parse_assignment(raw: &str) -> std::result::Result<(String, Value), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", raw))?;
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok((field.to_string(), parse_value(value)))
}

fn parse_log_level(raw: &str) -> Result<Level> {
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "FLAREZONE_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            raw
        ),
    }
}
