use anyhow::{Result, bail};
use scheduler_core::SettingsPatch;

use super::Store;
use crate::SettingsCommand;
use crate::render;

pub fn run(store: &Store<'_>, command: SettingsCommand) -> Result<()> {
    let settings = match command {
        SettingsCommand::Show => store.settings()?,
        SettingsCommand::Set {
            theme,
            default_reminder,
            notifications,
        } => {
            let patch = SettingsPatch {
                theme,
                default_reminder_time: default_reminder,
                notifications,
            };
            if patch == SettingsPatch::default() {
                bail!("Nothing to update; pass --theme, --default-reminder or --notifications");
            }
            store.update_settings(&patch)?
        }
    };

    for line in render::settings_lines(&settings) {
        println!("{line}");
    }
    Ok(())
}
