//! Create a signed commit from staged changes

use std::path::PathBuf;

use autosign::agent::GpgConnectAgent;
use autosign::config::Config;
use autosign::git::GitRepo;
use autosign::keyring::GpgKeyStore;
use autosign::orchestrator::Orchestrator;
use autosign::output::{OutputMode, SignResult};

/// Run one full signing workflow against the configured repository.
pub fn sign(
    message: &str,
    key_file: Option<PathBuf>,
    repo_dir: Option<PathBuf>,
    gnupg_home: Option<PathBuf>,
    stage: &[String],
    mode: OutputMode,
) -> anyhow::Result<()> {
    let config = Config::from_env(key_file, repo_dir)?;

    let repo = GitRepo::discover(&config.repo_dir)?;
    for path in stage {
        repo.stage(path)?;
    }

    let store = gnupg_home.map_or_else(GpgKeyStore::new, GpgKeyStore::with_homedir);
    let transport = GpgConnectAgent::new();

    let orchestrator = Orchestrator::new(&store, &store, &transport, &repo);
    let outcome = orchestrator.run(&config.key_material, config.passphrase.as_bytes(), message)?;

    SignResult::from_outcome(&outcome).render(mode);
    Ok(())
}
