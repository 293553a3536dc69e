use anyhow::Result;
use console::style;
use konspekt_core::{KonspektError, Settings};

use crate::{
    Session, SettingsAction,
    ui::{check, print_error},
};

pub fn run(session: &Session, action: SettingsAction) -> Result<()> {
    let settings = Settings::load(&session.context, session.sink.clone());

    match action {
        SettingsAction::Show => print_settings(&settings.get()),
        SettingsAction::Set { key, value } => {
            let mut next = settings.get();
            if let Err(e) = next.apply(&key, &value) {
                print_error(KonspektError::from(e));
                std::process::exit(1);
            }
            settings.set(next.clone());
            println!("{} Saved", check());
            print_settings(&next);
        }
        SettingsAction::Reset => {
            settings.remove();
            println!("{} Settings reset to defaults", check());
            print_settings(&settings.get());
        }
    }

    Ok(())
}

fn print_settings(settings: &Settings) {
    for (name, value) in settings.entries() {
        println!("{:<14} {}", style(name).dim(), style(value).cyan());
    }
}
