use anyhow::{bail, Result};
use component_i18n::{Bundle, EngineConfig, Variables};
use tracing::info;

/// Render templates against a JSON bundle.
///
/// Usage: `i18n-render <bundle.json> [--lang <id>] [--var name=value]... <template>...`
fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("component_i18n=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = EngineConfig::from_env()?;

    info!("Loading bundle from {}", args.bundle);
    let engine = Bundle::from_path(&args.bundle)?.build_engine(config)?;

    for template in &args.templates {
        println!("{}", engine.t(template, args.language.as_deref(), &[&args.variables]));
    }

    let report = engine.metrics().report();
    info!(
        "Rendered {} template(s): {} string(s), {} placeholder(s)",
        args.templates.len(),
        report.translations,
        report.placeholders
    );
    Ok(())
}

#[derive(Debug)]
struct Args {
    bundle: String,
    language: Option<String>,
    variables: Variables,
    templates: Vec<String>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let Some(bundle) = args.next() else {
            bail!("Usage: i18n-render <bundle.json> [--lang <id>] [--var name=value]... <template>...");
        };

        let mut language = None;
        let mut variables = Variables::new();
        let mut templates = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--lang" => match args.next() {
                    Some(lang) => language = Some(lang),
                    None => bail!("--lang requires a language id"),
                },
                "--var" => {
                    let Some(pair) = args.next() else {
                        bail!("--var requires name=value");
                    };
                    let Some((name, value)) = pair.split_once('=') else {
                        bail!("Invalid --var '{}', expected name=value", pair);
                    };
                    variables.insert(name, value);
                }
                _ => templates.push(arg),
            }
        }

        Ok(Self {
            bundle,
            language,
            variables,
            templates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let parsed = Args::parse(args(&[
            "bundle.json",
            "--lang",
            "es",
            "--var",
            "name=Ada",
            "{{app.welcome}}",
            "{name}",
        ]))
        .unwrap();

        assert_eq!(parsed.bundle, "bundle.json");
        assert_eq!(parsed.language.as_deref(), Some("es"));
        assert_eq!(parsed.variables.get("name").unwrap().render(), "Ada");
        assert_eq!(parsed.templates, vec!["{{app.welcome}}", "{name}"]);
    }

    #[test]
    fn test_parse_requires_bundle() {
        assert!(Args::parse(args(&[])).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_var() {
        assert!(Args::parse(args(&["b.json", "--var", "novalue"])).is_err());
        assert!(Args::parse(args(&["b.json", "--lang"])).is_err());
    }
}
