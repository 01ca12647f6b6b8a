// ABOUTME: Example application sending one SMS to several recipients through a configured gateway
// ABOUTME: Shows registry setup, TOML config loading and the fallback send with a JSON report

use argh::FromArgs;
use sms_dispatch::{
    ClientBuilder, FieldMap, Params, Provider, ProviderConfig, ProviderRegistry, ProviderResponse,
    Rule, RuleSet, SmsConfig,
};
use std::error::Error;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Example application sending a message to one or more recipients
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// path to the TOML configuration (default: demos/sms.toml)
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// retry each failed recipient once
    #[argh(switch)]
    fallback: bool,

    /// the message to send
    #[argh(option, short = 'm')]
    message: String,

    /// a recipient telephone number, may be repeated
    #[argh(option, short = 't')]
    to: Vec<String>,
}

/// Plain form gateway answering `OK <id>` on success
struct FormGateway {
    url: String,
    config: ProviderConfig,
}

impl Provider for FormGateway {
    fn url(&self) -> &str {
        &self.url
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn map_params(&self, recipient: &str, message: &str, params: &Params) -> Option<FieldMap> {
        let mut fields = params.clone();
        fields.insert("msisdn".into(), recipient.into());
        fields.insert("sms".into(), message.into());
        Some(fields)
    }

    fn validation_rules(&self) -> RuleSet {
        RuleSet::new()
            .field("msisdn", [Rule::Required, Rule::Numeric, Rule::MaxLength(15)])
            .field("sms", [Rule::Required])
            .field("user", [Rule::Required])
            .field("pass", [Rule::Required])
    }

    fn parse_response(&self, raw: &str) -> ProviderResponse {
        match raw.trim().strip_prefix("OK") {
            Some(id) => ProviderResponse::accepted(id.trim()),
            None => ProviderResponse::rejected(raw.trim()),
        }
    }
}

fn form_gateway(config: ProviderConfig, url: Option<String>) -> Arc<dyn Provider> {
    Arc::new(FormGateway {
        url: url.unwrap_or_else(|| "http://localhost:8080/send".to_owned()),
        config,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let level = if cli_args.debugging {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli_args.config.unwrap_or_else(|| "demos/sms.toml".to_owned());
    let config = SmsConfig::from_file(&config_path)?;

    let registry = ProviderRegistry::new().register("form", form_gateway);
    let client = ClientBuilder::from_config(&registry, &config)?.build()?;

    let report = if cli_args.fallback {
        client
            .send_with_fallback(cli_args.to, &cli_args.message, &Params::new())
            .await
    } else {
        client
            .send(cli_args.to, &cli_args.message, &Params::new())
            .await
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
