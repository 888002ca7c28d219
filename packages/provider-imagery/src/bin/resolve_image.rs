// Resolve one provider's image from the command line, for checking tables
// and websites before they reach the directory.

use anyhow::{Context, Result};
use clap::Parser;
use provider_imagery::{ImageResolver, MemoryCache, ProviderDescriptor, ResolverConfig};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "resolve-image", about = "Resolve a provider card image")]
struct Args {
    /// Provider display name
    #[arg(long)]
    name: String,

    /// Saved provider id (treated as durable)
    #[arg(long, conflicts_with = "reference")]
    id: Option<String>,

    /// External search-result reference (treated as ephemeral)
    #[arg(long)]
    reference: Option<String>,

    /// Specialty tag, repeatable
    #[arg(long = "specialty")]
    specialties: Vec<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    website: Option<String>,

    /// Curated image already on file
    #[arg(long)]
    existing: Option<String>,
}

impl Args {
    fn descriptor(&self) -> ProviderDescriptor {
        let mut descriptor = match (&self.id, &self.reference) {
            (Some(id), _) => ProviderDescriptor::durable(id.as_str(), &self.name),
            (None, Some(reference)) => ProviderDescriptor::ephemeral(reference, &self.name),
            (None, None) => ProviderDescriptor::ephemeral(&self.name, &self.name),
        }
        .with_specialties(self.specialties.iter().cloned());

        if let Some(description) = &self.description {
            descriptor = descriptor.with_description(description);
        }
        if let Some(website) = &self.website {
            descriptor = descriptor.with_website(website);
        }
        if let Some(existing) = &self.existing {
            descriptor = descriptor.with_existing_image(existing);
        }
        descriptor
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,provider_imagery=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = ResolverConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        timeout_ms = config.fetch_timeout.as_millis() as u64,
        user_agent = %config.user_agent,
        "Configuration loaded"
    );

    let resolver = ImageResolver::from_config(config, MemoryCache::new())
        .context("Failed to build resolver")?;

    let descriptor = args.descriptor();
    let result = resolver.resolve(&descriptor).await;
    let icon = resolver.assign_icon(&descriptor);
    resolver.flush_writes().await;

    let output = json!({
        "provider": descriptor.identity,
        "result": result,
        "icon": icon,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to encode result")?
    );

    Ok(())
}
