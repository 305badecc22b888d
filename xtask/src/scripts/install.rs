use crate::cli;
use color_eyre::eyre::{OptionExt, Result};
use duct::cmd;
use std::env;
use std::path::PathBuf;

pub fn install(args: &cli::InstallArgs) -> Result<()> {
    println!("Building {} in release mode...", args.name);

    cmd!("cargo", "build", "--bin", &args.name, "--release").run()?;

    let install_dir = match &args.path {
        Some(path) => PathBuf::from(path),
        None => {
            let home = env::var_os("HOME")
                .or_else(|| env::var_os("USERPROFILE"))
                .ok_or_eyre("Could not determine home directory")?;
            PathBuf::from(home).join(".local").join("bin")
        }
    };

    if !install_dir.exists() {
        println!("Creating directory: {}", install_dir.display());
        std::fs::create_dir_all(&install_dir)?;
    }

    let source_path = PathBuf::from("target").join("release").join(&args.name);
    let dest_path = install_dir.join(&args.name);

    println!("Installing {} to {}", args.name, dest_path.display());
    std::fs::copy(&source_path, &dest_path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&dest_path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&dest_path, perms)?;
    }

    println!("Installed {} to {}", args.name, dest_path.display());

    if let Some(path_var) = env::var_os("PATH") {
        if !env::split_paths(&path_var).any(|p| p == install_dir) {
            println!("\nNote: {} is not in your PATH.", install_dir.display());
        }
    }

    Ok(())
}
