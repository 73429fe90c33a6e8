use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use alps_setup_lib::consts::ENV_CONFIG;
use alps_setup_lib::platform::Platform;
use alps_setup_lib::platform::paths::default_config_file;

use crate::output::print_stat;

pub fn cmd_info(config: Option<&Path>) -> Result<ExitCode> {
  let platform = Platform::current();

  println!("System:");
  print_stat("Platform", &platform);
  print_stat("OS", platform.os.as_str());
  print_stat("Arch", platform.arch);
  print_stat("CPUs", platform.cpus);
  print_stat("Library path", platform.os.library_path_var());

  let config_file = config
    .map(Path::to_path_buf)
    .or_else(|| std::env::var_os(ENV_CONFIG).map(Into::into))
    .or_else(default_config_file);
  match config_file {
    Some(path) if path.is_file() => print_stat("Config", path.display()),
    Some(path) => print_stat("Config", format!("{} (not found, using defaults)", path.display())),
    None => print_stat("Config", "defaults"),
  }

  Ok(ExitCode::SUCCESS)
}
