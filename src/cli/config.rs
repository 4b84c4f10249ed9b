use crate::config::{set_config, Settings, CONFIG_KEYS};

/// Run the config command
pub fn run_config(key: Option<&str>, value: Option<&str>) -> Result<(), String> {
    let settings = Settings::load();

    match (key, value) {
        (None, None) => {
            println!("Current configuration:\n");
            for (k, description) in CONFIG_KEYS {
                let v = settings.display_value(k).unwrap_or_default();
                println!("  {:14} {:40} {}", k, v, description);
            }
        }
        (Some(k), None) => match settings.display_value(k) {
            Some(v) => println!("{}: {}", k, v),
            None => return Err(format!("Unknown config key: {}", k)),
        },
        (Some(k), Some(v)) => {
            set_config(k, v)?;
            if k == "api_key" {
                println!("Set api_key");
            } else {
                println!("Set {} = {}", k, v);
            }
        }
        (None, Some(_)) => {
            return Err("Key required when setting a value".to_string());
        }
    }

    Ok(())
}
