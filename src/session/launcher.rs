//! Start a new editor for a folder, listening on a socket the locator can find.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use super::locator::generate_socket_name;
use super::SessionError;
use crate::config::Config;
use crate::identity::SessionIdentity;

/// Prepare the editor process for `identity` without starting it
///
/// Returns the command and the socket path the editor will listen on.
pub fn launch_command(identity: &SessionIdentity, config: &Config) -> (Command, PathBuf) {
    let socket_name = generate_socket_name(&config.socket_prefix, identity.identity_hash());
    let socket_path = config.socket_dir.join(socket_name);

    let mut command = Command::new(&config.editor);
    command
        .arg("--listen")
        .arg(&socket_path)
        .current_dir(identity.working_directory());

    (command, socket_path)
}

/// Run the editor in the foreground until it exits
pub fn launch(identity: &SessionIdentity, config: &Config) -> Result<ExitStatus, SessionError> {
    let (mut command, socket_path) = launch_command(identity, config);
    tracing::info!(
        "Launching '{}' for {} on {}",
        config.editor,
        identity,
        socket_path.display()
    );

    command.status().map_err(|source| SessionError::Launch {
        editor: config.editor.clone(),
        source,
    })
}
