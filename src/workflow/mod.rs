#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

/*!
Merge workflow module.

This module wires together:
- `session`: the interactive three-slot merge session state machine

Typical usage:
- Construct a `MergeSession` with loaded `Settings` and a `Ui`.
- Call `MergeSession::run`; the returned `SessionOutcome` tells the caller
  whether to exit or start a fresh session.

Example:
```no_run
use ledmerge::settings::Settings;
use ledmerge::ui::TerminalUi;
use ledmerge::workflow::MergeSession;

let settings = Settings::default();
let mut session = MergeSession::new(settings, "settings.json".into(), TerminalUi::new());
// session.run()?;
```

Public re-exports:
- `MergeSession`: the session state machine.
- `SessionOutcome`: how a session ended.
- `source_choices`: budget eligibility over a source file's LED slots.
*/

pub mod session;

// Re-exports for convenient access from `ledmerge::workflow::*`
pub use session::{MergeSession, SessionOutcome, source_choices};
