//! The `altai describe` command.

use altai_core::{AltText, AltTextRequest, Config, ImageTransport, ModelOverrides, Provider};
use clap::{Args, ValueEnum};
use std::time::Duration;

/// Arguments for the `describe` command.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// URL of the image to describe
    pub image_url: String,

    /// Provider to use (defaults to `harness.provider` from the config)
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Surrounding page text, to judge what the image means in place
    #[arg(long)]
    pub context: Option<String>,

    /// Markup or code the image is embedded in
    #[arg(long)]
    pub code: Option<String>,

    /// How the image reaches the provider
    #[arg(short, long, value_enum, default_value = "url")]
    pub transport: TransportArg,

    /// Model name (overrides config and provider default)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Message role the prompt is sent as
    #[arg(long)]
    pub role: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Output token budget
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// API key (overrides config and environment)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

/// Supported providers.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProviderArg {
    /// OpenAI (gpt-4o-mini)
    Openai,
    /// Groq, OpenAI-compatible endpoint
    Groq,
    /// Fireworks AI, OpenAI-compatible endpoint
    Fireworks,
    /// Google Gemini
    Gemini,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Openai => Provider::OpenAi,
            ProviderArg::Groq => Provider::Groq,
            ProviderArg::Fireworks => Provider::Fireworks,
            ProviderArg::Gemini => Provider::Gemini,
        }
    }
}

/// Image transport mode.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TransportArg {
    /// Send the URL; the provider fetches the image
    Url,
    /// Download here and send the bytes inline
    Base64,
}

impl From<TransportArg> for ImageTransport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Url => ImageTransport::Url,
            TransportArg::Base64 => ImageTransport::Base64,
        }
    }
}

/// Execute the describe command.
pub async fn execute(args: DescribeArgs, config: &Config) -> anyhow::Result<()> {
    let provider = match args.provider {
        Some(arg) => Provider::from(arg),
        None => config
            .harness
            .provider
            .parse::<Provider>()
            .map_err(|e| anyhow::anyhow!(e.error))?,
    };
    let overrides = build_overrides(&args, config, provider, |name| std::env::var(name).ok());

    let mut request =
        AltTextRequest::new(args.image_url.clone()).with_transport(args.transport.into());
    request.context = args.context.clone();
    request.code = args.code.clone();

    let timeout = Duration::from_millis(config.harness.timeout_ms);
    tracing::debug!(
        provider = provider.as_str(),
        timeout_ms = config.harness.timeout_ms,
        "Describing {}",
        args.image_url
    );

    let spinner = create_spinner(provider);
    let outcome = tokio::time::timeout(
        timeout,
        AltText::new().describe(provider, request, &overrides),
    )
    .await;
    spinner.finish_and_clear();

    let outcome = match outcome {
        Ok(result) => result?,
        Err(_) => anyhow::bail!(
            "{} did not answer within {} ms",
            provider.display_name(),
            config.harness.timeout_ms
        ),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{json}");

    if let Some(error) = outcome.error() {
        anyhow::bail!("{error}");
    }
    Ok(())
}

/// Layer CLI flags over the provider's config table and resolve the API key.
fn build_overrides(
    args: &DescribeArgs,
    config: &Config,
    provider: Provider,
    lookup: impl Fn(&str) -> Option<String>,
) -> ModelOverrides {
    let configured = config.overrides_for(provider);

    let flags = ModelOverrides {
        model: args.model.clone(),
        role: args.role.clone(),
        temperature: args.temperature,
        max_tokens: args.max_tokens,
        ..Default::default()
    };

    let mut overrides = configured.merged_with(&flags);
    overrides.api_key = resolve_api_key(
        args.api_key.as_deref(),
        configured.api_key.as_deref(),
        provider.api_key_env(),
        &lookup,
    );
    overrides
}

/// API key from the flag, then the config value, then the provider's env var.
fn resolve_api_key(
    flag: Option<&str>,
    configured: Option<&str>,
    env_var: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    flag.map(str::to_string)
        .filter(|k| !k.trim().is_empty())
        .or_else(|| configured.and_then(|value| resolve_env_var(value, lookup)))
        .or_else(|| lookup(env_var))
        .filter(|k| !k.trim().is_empty())
}

/// Expand `${VAR}` via `lookup`; other non-empty values pass through.
fn resolve_env_var(value: &str, lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        lookup(&value[2..value.len() - 1])
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn create_spinner(provider: Provider) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Waiting for {}", provider.display_name()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
