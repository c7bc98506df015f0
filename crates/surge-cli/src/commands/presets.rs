//! `surge presets`: browse factory presets and manage user ones.

use super::common::{SettingsArgs, load_preset};
use clap::{Args, Subcommand};
use surge_config::{
    Preset, PresetDirs, SettingsValidator, ensure_user_presets_dir, factory_presets,
    get_factory_preset, list_user_presets, preset_name_from_path, system_presets_dir,
    user_config_dir, user_presets_dir,
};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,

        /// Print the preset as TOML
        #[arg(long)]
        toml: bool,
    },

    /// Save settings as a user preset
    Save {
        /// Name for the new preset
        name: String,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Store every setting, not only the ones given
        #[arg(long)]
        full: bool,

        /// Overwrite if preset already exists
        #[arg(long)]
        force: bool,
    },

    /// Delete a user preset
    Delete {
        /// Preset name to delete
        name: String,

        /// Confirm deletion
        #[arg(long)]
        force: bool,
    },

    /// Copy a factory preset to user presets for customization
    Copy {
        /// Factory preset name
        source: String,

        /// New preset name (optional, uses source name if not specified)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => list_presets(factory, user),
        PresetsCommand::Show { name, toml } => show_preset(&name, toml),
        PresetsCommand::Save {
            name,
            settings,
            description,
            full,
            force,
        } => save_preset(&name, &settings, description.as_deref(), full, force),
        PresetsCommand::Delete { name, force } => delete_preset(&name, force),
        PresetsCommand::Copy { source, name } => copy_preset(&source, name.as_deref()),
        PresetsCommand::Paths => show_paths(),
    }
}

fn list_presets(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    if !user_only {
        print_heading("Factory presets");
        for preset in factory_presets() {
            print_entry(&preset.name, preset.description.as_deref());
        }
        println!();
    }

    if !factory_only {
        print_heading("User presets");
        let files = list_user_presets();
        if files.is_empty() {
            println!("  (none)");
            println!();
            println!("  Save one with: surge presets save <name> --set fadein=20ms");
        }
        for path in files {
            let name = preset_name_from_path(&path).unwrap_or_else(|| path.display().to_string());
            match Preset::load(&path) {
                Ok(preset) => print_entry(&name, preset.description.as_deref()),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable preset");
                    print_entry(&name, Some("(unreadable)"));
                }
            }
        }
        println!();
    }

    Ok(())
}

fn print_heading(title: &str) {
    println!("{title}");
    println!("{}", "-".repeat(title.len()));
}

fn print_entry(name: &str, description: Option<&str>) {
    match description {
        Some(desc) => println!("  {name:20}  {desc}"),
        None => println!("  {name}"),
    }
}

fn show_preset(name: &str, as_toml: bool) -> anyhow::Result<()> {
    let preset = load_preset(name)?;

    if as_toml {
        print!("{}", preset.to_toml()?);
        return Ok(());
    }

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();

    if let Some(desc) = &preset.description {
        println!("Description: {}", desc);
        println!();
    }

    println!("Sample Rate: {} Hz", preset.sample_rate);
    println!();

    // Resolve so the listing shows what the filter actually gets.
    let settings = preset.to_settings()?;
    let full = Preset::from_settings(&preset.name, &settings);
    let validator = SettingsValidator::new();

    println!("Settings ({} changed):", preset.len());
    for id in validator.param_ids() {
        let value = full.get_setting(id).unwrap_or("");
        let marker = if preset.get_setting(id).is_some() || has_alias(&preset, &validator, id) {
            "*"
        } else {
            " "
        };
        println!("  {} {:8} = {}", marker, id, value);
    }

    Ok(())
}

/// Whether the preset sets `id` under another accepted key.
fn has_alias(preset: &Preset, validator: &SettingsValidator, id: &str) -> bool {
    preset
        .iter()
        .any(|(key, _)| validator.descriptor(key).is_some_and(|d| d.string_id == id))
}

/// Preset built from `settings`, sparse unless `full`.
fn build_preset(name: &str, settings: &SettingsArgs, full: bool) -> anyhow::Result<Preset> {
    let mut preset = if full {
        Preset::from_settings(name, &settings.settings()?)
    } else {
        let mut preset = settings.preset()?;
        preset.name = name.to_string();
        preset
    };
    preset.description = None;
    Ok(preset)
}

fn save_preset(
    name: &str,
    settings: &SettingsArgs,
    description: Option<&str>,
    full: bool,
    force: bool,
) -> anyhow::Result<()> {
    ensure_user_presets_dir()?;
    let preset_path = PresetDirs::default().user_preset_path(name);
    anyhow::ensure!(
        force || !preset_path.exists(),
        "preset '{name}' exists; pass --force to overwrite"
    );

    let mut preset = build_preset(name, settings, full)?;
    if let Some(desc) = description {
        preset = preset.with_description(desc);
    }
    preset.save(&preset_path)?;

    println!("Saved {}", preset_path.display());
    Ok(())
}

fn delete_preset(name: &str, force: bool) -> anyhow::Result<()> {
    let path = PresetDirs::default().user_preset_path(name);

    if !path.is_file() {
        anyhow::ensure!(
            get_factory_preset(name).is_none(),
            "Cannot delete factory preset '{name}'. Factory presets are built-in."
        );
        anyhow::bail!("no user preset named '{name}'");
    }
    anyhow::ensure!(force, "refusing to delete '{name}' without --force");

    std::fs::remove_file(&path)?;
    println!("Deleted {}", path.display());
    Ok(())
}

fn copy_preset(source: &str, new_name: Option<&str>) -> anyhow::Result<()> {
    let factory = get_factory_preset(source)
        .ok_or_else(|| anyhow::anyhow!("no factory preset named '{source}'"))?;
    let target = new_name.unwrap_or(source);

    ensure_user_presets_dir()?;
    let path = PresetDirs::default().user_preset_path(target);
    anyhow::ensure!(
        !path.exists(),
        "user preset '{target}' exists; pick another name with --name"
    );

    let description = factory.description.as_ref().map(|d| format!("{d} (copy)"));
    let copy = Preset {
        name: target.to_string(),
        description,
        ..factory
    };
    copy.save(&path)?;

    println!("Copied '{source}' to {}", path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    println!("config  {}", user_config_dir().display());
    println!("user    {}", user_presets_dir().display());
    println!("system  {}", system_presets_dir().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(preset: Option<&str>, overrides: &[&str]) -> SettingsArgs {
        SettingsArgs {
            preset: preset.map(str::to_string),
            overrides: overrides.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn sparse_preset_keeps_only_given_settings() {
        let preset = build_preset("mine", &args(None, &["fadein=5ms", "modeout=Sine"]), false)
            .unwrap();
        assert_eq!(preset.name, "mine");
        assert_eq!(preset.len(), 2);
        assert_eq!(preset.get_setting("fadein"), Some("5ms"));
    }

    #[test]
    fn sparse_preset_inherits_base_preset() {
        let preset =
            build_preset("mine", &args(Some("punch_in"), &["fadein=8ms"]), false).unwrap();
        assert_eq!(preset.get_setting("fadein"), Some("8ms"));
        assert_eq!(preset.get_setting("modein"), Some("Cubic"));
        assert!(preset.description.is_none());
    }

    #[test]
    fn full_preset_lists_every_setting() {
        let preset = build_preset("mine", &args(None, &["thr_on=-50dB"]), true).unwrap();
        assert_eq!(preset.len(), 18);
        assert_eq!(preset.get_setting("thr_on"), Some("-50 dB"));
    }

    #[test]
    fn alias_keys_are_recognized() {
        let validator = SettingsValidator::new();
        let preset = Preset::new("x").with_setting("Fade In Time", "5 ms");
        assert!(has_alias(&preset, &validator, "fadein"));
        assert!(!has_alias(&preset, &validator, "fadeout"));
    }
}
