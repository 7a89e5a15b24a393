use log::debug;
use std::io::{self, IsTerminal};

use crate::shell::Shell;
use crate::utils::config::Config;
use crate::utils::log::init_logger;
use crate::utils::theme::Theme;

mod shell;
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new();
    init_logger(&config);
    debug!("配置加载成功 {}", config.config_dir.display());

    // 输出不是终端时不要颜色
    if !io::stdout().is_terminal() || !io::stderr().is_terminal() {
        colored::control::set_override(false);
    }
    let theme = Theme::load_theme(&config.theme);

    let shell = Shell::new(&config, theme);
    shell.run()
}
