use acorn::config::{AppConfig, ApplyToConfig};

use crate::cli::ClapCli;

impl ApplyToConfig for ClapCli {
    fn apply_to_config(&self, mut config: AppConfig) -> AppConfig {
        if let Some(dir) = self.dotfiles_root.as_ref() {
            *config.dotfiles_root_mut() = dir.clone();
        }

        // Flags can only switch these on.
        if self.dry_run {
            *config.dry_run_mut() = true;
        }
        if self.verbose {
            *config.verbose_mut() = true;
        }
        if self.no_color {
            *config.use_colors_mut() = false;
        }

        config
    }
}
