//! CLI entry point for soundcheck.

use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Result, WrapErr};

use soundcheck::audio::Mixer;
use soundcheck::cli::{Cli, OutputFormat};
use soundcheck::logging::init_logging;
use soundcheck::sound::SoundTab;
use soundcheck::store::SettingsStore;
use soundcheck::tui;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "soundcheck", &mut std::io::stdout());
        return Ok(());
    }

    // The dialog always logs; one-shot runs only when asked to
    let _guard = (cli.interactive || cli.log_file.is_some())
        .then(|| init_logging(cli.log_file.as_deref(), Some(cli.log_level.as_str())));

    if cli.interactive {
        return tui::run(&cli);
    }

    let mut store = SettingsStore::load(&cli.settings)
        .wrap_err_with(|| format!("Failed to load settings from {}", cli.settings.display()))?;
    let mut mixer = Mixer::from_store(&store);
    let mut tab = SoundTab::new(&store, &mixer);

    for warning in cli.apply_to(&mut tab, &mut store, &mut mixer) {
        eprintln!("Warning: {warning}");
    }

    if cli.has_changes() && !cli.dry_run {
        mixer.persist(&mut store);
        store
            .save(&cli.settings)
            .wrap_err_with(|| format!("Failed to write to {}", cli.settings.display()))?;
        eprintln!("Wrote settings to {}", cli.settings.display());
    }

    let summary = tab.summary();
    let output = match cli.format {
        OutputFormat::Toml => {
            toml::to_string_pretty(&summary).wrap_err("Failed to serialize settings to TOML")?
        }
        OutputFormat::Json => serde_json::to_string_pretty(&summary)
            .wrap_err("Failed to serialize settings to JSON")?,
    };
    println!("{}", output.trim_end());

    Ok(())
}
