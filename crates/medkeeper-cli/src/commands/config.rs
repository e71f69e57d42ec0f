use clap::Subcommand;
use medkeeper_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full configuration as TOML
    Show,
    /// Get a value by key
    Get { key: String },
    /// Set a value by key
    Set {
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let cfg = Config::load()?;
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigAction::Get { key } => {
            let cfg = Config::load()?;
            match cfg.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut cfg = Config::load()?;
            cfg.set(&key, &value)?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}
