//! The wizard state machine.
//!
//! A single-threaded, event-driven controller sequencing skill selection,
//! variable configuration, deploy-target input, confirmation, conflict
//! handling, build, and deploy.  Exactly one [`Mode`] is active at a time;
//! each variant carries only the data relevant to that screen, and
//! unhandled input leaves the state unchanged.
//!
//! Build and deploy run as one-shot background tasks.  Their inputs are
//! captured by value at dispatch and their single completion event comes
//! back over an mpsc channel drained by the run loop, so no mutable state
//! crosses the task boundary.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use skillforge_deploy::{
    Builder, BuiltArtifact, DeployError, DeployRequest, artifact_exists, deploy,
};
use skillforge_manifest::{Manifest, SkillError, Variable};

use crate::input::TextField;

/// Maximum characters of a secret shown in the confirm summary.
const SECRET_PREVIEW_CHARS: usize = 8;

/// Completion events from background build/deploy tasks.
#[derive(Debug)]
pub enum WizardEvent {
    /// The build task finished.
    BuildFinished(Result<BuiltArtifact, DeployError>),
    /// The deploy task finished.
    DeployFinished(Result<(), DeployError>),
}

/// Actions the run loop should take after processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Continue the main loop.
    Continue,
    /// Exit the application.
    Quit,
}

/// Terminal status shown on the `Done` screen.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Deploy completed.
    Success,
    /// Build or deploy failed.  `build_output` carries the compiler's raw
    /// combined output when the failure was a build failure.
    Failed { error: String, build_output: String },
}

impl Outcome {
    fn from_error(error: DeployError) -> Self {
        match error {
            DeployError::BuildFailed { output } => Self::Failed {
                error: "build failed".to_owned(),
                build_output: output,
            },
            other => Self::Failed {
                error: other.to_string(),
                build_output: String::new(),
            },
        }
    }
}

/// The active wizard screen.  One variant at a time; each carries only
/// the state that screen needs.
#[derive(Debug)]
pub enum Mode {
    /// Pick a skill (or inspect a load error).
    SelectSkill { cursor: usize },
    /// Fill in the skill's configuration variables.
    ConfigureVariables { inputs: Vec<TextField>, focus: usize },
    /// Fill in base folder and skill folder name.
    ConfigureDeployTarget { inputs: [TextField; 2], focus: usize },
    /// Review and confirm.
    Confirm,
    /// The deploy path already holds a built artifact.
    OverwriteWarning,
    /// Build (and then deploy) task in flight.
    Building,
    /// Terminal success or failure.
    Done { outcome: Outcome },
}

impl Default for Mode {
    fn default() -> Self {
        Self::SelectSkill { cursor: 0 }
    }
}

/// The wizard: discovery results, session values, active mode, and the
/// completion-event channel.
pub struct Wizard {
    version: String,
    manifests: Vec<Manifest>,
    skill_errors: Vec<SkillError>,
    builder: Builder,

    /// Index into `manifests` once a skill is chosen.
    selected: Option<usize>,

    /// Finalized configuration values, kept across back-outs and restarts.
    values: BTreeMap<String, String>,

    /// Persisted deploy target: base folder for skills.
    base_folder: String,

    /// Persisted deploy target: sub-folder / skill name.
    folder_name: String,

    /// Inline error for the current step.
    error: Option<String>,

    mode: Mode,

    event_tx: mpsc::UnboundedSender<WizardEvent>,
    event_rx: mpsc::UnboundedReceiver<WizardEvent>,
}

impl Wizard {
    /// Create a wizard over the discovery results.
    pub fn new(
        manifests: Vec<Manifest>,
        skill_errors: Vec<SkillError>,
        builder: Builder,
        version: impl Into<String>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            version: version.into(),
            manifests,
            skill_errors,
            builder,
            selected: None,
            values: BTreeMap::new(),
            base_folder: String::new(),
            folder_name: String::new(),
            error: None,
            mode: Mode::default(),
            event_tx,
            event_rx,
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn manifests(&self) -> &[Manifest] {
        &self.manifests
    }

    pub fn skill_errors(&self) -> &[SkillError] {
        &self.skill_errors
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The selected manifest, if any.
    pub fn selected_manifest(&self) -> Option<&Manifest> {
        self.selected.and_then(|i| self.manifests.get(i))
    }

    pub fn base_folder(&self) -> &str {
        &self.base_folder
    }

    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// The resolved deploy path: base folder joined with the folder name.
    pub fn deploy_path(&self) -> PathBuf {
        PathBuf::from(&self.base_folder).join(&self.folder_name)
    }

    /// The configured value for a variable, rendered for display: secrets
    /// are truncated to a short preview.
    pub fn preview_value(&self, variable: &Variable) -> String {
        let value = self
            .values
            .get(&variable.name)
            .cloned()
            .unwrap_or_default();
        if variable.kind.is_secret() && value.chars().count() > SECRET_PREVIEW_CHARS {
            let head: String = value.chars().take(SECRET_PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            value
        }
    }

    // -- Key handling -------------------------------------------------------

    /// Handle a key event and return the action the run loop should take.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // Global quit.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }

        let mode = std::mem::take(&mut self.mode);
        let (mode, action) = match mode {
            Mode::SelectSkill { cursor } => self.on_select_key(cursor, key),
            Mode::ConfigureVariables { inputs, focus } => {
                self.on_variables_key(inputs, focus, key)
            }
            Mode::ConfigureDeployTarget { inputs, focus } => {
                self.on_target_key(inputs, focus, key)
            }
            Mode::Confirm => self.on_confirm_key(key),
            Mode::OverwriteWarning => self.on_overwrite_key(key),
            Mode::Building => (Mode::Building, AppAction::Continue),
            Mode::Done { outcome } => self.on_done_key(outcome, key),
        };
        self.mode = mode;
        action
    }

    fn on_select_key(&mut self, mut cursor: usize, key: KeyEvent) -> (Mode, AppAction) {
        let total = self.manifests.len() + self.skill_errors.len();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                return (Mode::SelectSkill { cursor }, AppAction::Quit);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                cursor = cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if cursor + 1 < total {
                    cursor += 1;
                }
            }
            KeyCode::Enter => {
                if cursor < self.manifests.len() {
                    self.selected = Some(cursor);
                    self.error = None;
                    return (self.enter_configure_variables(), AppAction::Continue);
                }
                if let Some(err) = self.skill_errors.get(cursor - self.manifests.len()) {
                    // Error entry: stay, surface the stored reason.
                    self.error = Some(err.reason.clone());
                }
            }
            _ => {}
        }

        (Mode::SelectSkill { cursor }, AppAction::Continue)
    }

    fn on_variables_key(
        &mut self,
        mut inputs: Vec<TextField>,
        mut focus: usize,
        key: KeyEvent,
    ) -> (Mode, AppAction) {
        match key.code {
            KeyCode::Esc => {
                // Back out without losing anything already typed.
                self.save_values(&inputs);
                self.error = None;
                let cursor = self.selected.unwrap_or(0);
                return (Mode::SelectSkill { cursor }, AppAction::Continue);
            }
            KeyCode::Tab | KeyCode::Down => {
                if !inputs.is_empty() {
                    focus = (focus + 1) % inputs.len();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if !inputs.is_empty() {
                    focus = focus.checked_sub(1).unwrap_or(inputs.len() - 1);
                }
            }
            KeyCode::Enter => {
                if let Some(label) = self.first_missing_required(&inputs) {
                    self.error = Some(format!("{label} is required"));
                } else {
                    self.save_values(&inputs);
                    self.error = None;
                    return (self.enter_deploy_target(), AppAction::Continue);
                }
            }
            _ => {
                if let Some(input) = inputs.get_mut(focus) {
                    input.handle_key(key);
                }
            }
        }

        (Mode::ConfigureVariables { inputs, focus }, AppAction::Continue)
    }

    fn on_target_key(
        &mut self,
        mut inputs: [TextField; 2],
        mut focus: usize,
        key: KeyEvent,
    ) -> (Mode, AppAction) {
        match key.code {
            KeyCode::Esc => {
                self.error = None;
                return (self.enter_configure_variables(), AppAction::Continue);
            }
            KeyCode::Tab | KeyCode::Down => {
                focus = (focus + 1) % inputs.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                focus = focus.checked_sub(1).unwrap_or(inputs.len() - 1);
            }
            KeyCode::Enter => {
                if let Some(empty) = inputs.iter().find(|i| i.is_empty()) {
                    self.error = Some(format!("{} is required", empty.label()));
                } else {
                    self.base_folder = inputs[0].value().to_owned();
                    self.folder_name = inputs[1].value().to_owned();
                    self.error = None;
                    return (Mode::Confirm, AppAction::Continue);
                }
            }
            _ => {
                inputs[focus].handle_key(key);
            }
        }

        (Mode::ConfigureDeployTarget { inputs, focus }, AppAction::Continue)
    }

    fn on_confirm_key(&mut self, key: KeyEvent) -> (Mode, AppAction) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => {
                (self.enter_deploy_target(), AppAction::Continue)
            }
            KeyCode::Enter | KeyCode::Char('y') => {
                let binary_name = self
                    .selected_manifest()
                    .map(|m| m.binary_name().to_owned())
                    .unwrap_or_default();
                if artifact_exists(&self.deploy_path(), &binary_name) {
                    (Mode::OverwriteWarning, AppAction::Continue)
                } else {
                    (self.start_build(), AppAction::Continue)
                }
            }
            _ => (Mode::Confirm, AppAction::Continue),
        }
    }

    fn on_overwrite_key(&mut self, key: KeyEvent) -> (Mode, AppAction) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => (Mode::Confirm, AppAction::Continue),
            KeyCode::Char('y') => (self.start_build(), AppAction::Continue),
            _ => (Mode::OverwriteWarning, AppAction::Continue),
        }
    }

    fn on_done_key(&mut self, outcome: Outcome, key: KeyEvent) -> (Mode, AppAction) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('q') | KeyCode::Esc => {
                (Mode::Done { outcome }, AppAction::Quit)
            }
            KeyCode::Char('r') => {
                // Restart, clearing status and selection.  Entered values
                // are kept so a re-run pre-fills the inputs.
                self.selected = None;
                self.error = None;
                (Mode::default(), AppAction::Continue)
            }
            _ => (Mode::Done { outcome }, AppAction::Continue),
        }
    }

    // -- Transitions --------------------------------------------------------

    /// Build the variable-input screen, seeded from saved values.
    fn enter_configure_variables(&self) -> Mode {
        let inputs = match self.selected_manifest() {
            Some(manifest) => manifest
                .variables
                .iter()
                .map(|v| {
                    let mut field = TextField::new(&v.label)
                        .with_secret(v.kind.is_secret())
                        .with_placeholder(v.effective_placeholder().unwrap_or_default());
                    if let Some(saved) = self.values.get(&v.name) {
                        field = field.with_value(saved);
                    }
                    field
                })
                .collect(),
            None => Vec::new(),
        };
        Mode::ConfigureVariables { inputs, focus: 0 }
    }

    /// Build the deploy-target screen, pre-filled with persisted values
    /// and the manifest's name.
    fn enter_deploy_target(&self) -> Mode {
        let skill_name = self
            .selected_manifest()
            .map(|m| m.name.clone())
            .unwrap_or_default();

        let base = TextField::new("Skills Folder")
            .with_placeholder("/path/to/skills/")
            .with_value(&self.base_folder);

        let name_value = if self.folder_name.is_empty() {
            skill_name.clone()
        } else {
            self.folder_name.clone()
        };
        let name = TextField::new("Skill Name")
            .with_placeholder(skill_name)
            .with_value(name_value);

        Mode::ConfigureDeployTarget {
            inputs: [base, name],
            focus: 0,
        }
    }

    /// The label of the first required variable with an empty input.
    fn first_missing_required(&self, inputs: &[TextField]) -> Option<String> {
        let manifest = self.selected_manifest()?;
        manifest
            .variables
            .iter()
            .zip(inputs)
            .find(|(v, input)| v.required && input.is_empty())
            .map(|(v, _)| v.label.clone())
    }

    /// Persist the variable input values into the configuration map.
    fn save_values(&mut self, inputs: &[TextField]) {
        let Some(manifest) = self.selected_manifest() else {
            return;
        };
        let pairs: Vec<(String, String)> = manifest
            .variables
            .iter()
            .zip(inputs)
            .map(|(v, input)| (v.name.clone(), input.value().to_owned()))
            .collect();
        for (name, value) in pairs {
            self.values.insert(name, value);
        }
    }

    // -- Background tasks ---------------------------------------------------

    /// Dispatch the build task and enter `Building`.
    ///
    /// The mode stays `Building` until the deploy completion arrives, so a
    /// second task can never be triggered while one is in flight.
    fn start_build(&mut self) -> Mode {
        let Some(manifest) = self.selected_manifest().cloned() else {
            self.error = Some("no skill selected".to_owned());
            return Mode::default();
        };

        self.error = None;
        let builder = self.builder.clone();
        let tx = self.event_tx.clone();

        tracing::info!(skill = %manifest.name, "build task dispatched");
        tokio::spawn(async move {
            let result = builder.build(&manifest).await;
            let _ = tx.send(WizardEvent::BuildFinished(result));
        });

        Mode::Building
    }

    /// Dispatch the deploy task.  Valid only while `Building`.
    fn start_deploy(&self, artifact: BuiltArtifact) {
        let Some(manifest) = self.selected_manifest().cloned() else {
            return;
        };

        let request = DeployRequest {
            manifest,
            artifact,
            deploy_dir: self.deploy_path(),
            values: self.values.clone(),
        };
        let tx = self.event_tx.clone();

        tracing::info!(skill = %request.manifest.name, "deploy task dispatched");
        tokio::spawn(async move {
            let result = deploy(&request).await;
            let _ = tx.send(WizardEvent::DeployFinished(result));
        });
    }

    // -- Completion events --------------------------------------------------

    /// Drain pending completion events from background tasks.
    ///
    /// Called on every iteration of the run loop.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Apply one completion event.  Only valid in `Building`; events in
    /// any other mode are ignored.
    pub fn handle_event(&mut self, event: WizardEvent) {
        if !matches!(self.mode, Mode::Building) {
            tracing::warn!("completion event outside Building, ignoring");
            return;
        }

        match event {
            WizardEvent::BuildFinished(Ok(artifact)) => {
                // Build succeeded; deploy runs next.  Stay in Building.
                self.start_deploy(artifact);
            }
            WizardEvent::BuildFinished(Err(e)) => {
                self.mode = Mode::Done {
                    outcome: Outcome::from_error(e),
                };
            }
            WizardEvent::DeployFinished(Ok(())) => {
                self.mode = Mode::Done {
                    outcome: Outcome::Success,
                };
            }
            WizardEvent::DeployFinished(Err(e)) => {
                self.mode = Mode::Done {
                    outcome: Outcome::from_error(e),
                };
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crossterm::event::{KeyEventKind, KeyEventState};
    use skillforge_manifest::parse_manifest;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    fn type_text(w: &mut Wizard, text: &str) {
        for c in text.chars() {
            w.handle_key(key(KeyCode::Char(c)));
        }
    }

    const SECRET_MANIFEST: &str = r#"
name = "demo"
description = "Demo skill"

[[variables]]
name = "DEMO_API_KEY"
label = "API Key"
required = true
type = "secret"

[[variables]]
name = "DEMO_NOTE"
label = "Note"
"#;

    fn manifest_from(content: &str, dir: &Path) -> Manifest {
        let mut m = parse_manifest(content, Path::new("t/skill.toml")).unwrap();
        m.path = dir.to_path_buf();
        m
    }

    fn wizard_with(manifests: Vec<Manifest>, errors: Vec<SkillError>) -> Wizard {
        Wizard::new(manifests, errors, Builder::new("/tmp/skillforge-test-dist"), "test")
    }

    fn secret_wizard() -> Wizard {
        wizard_with(
            vec![manifest_from(SECRET_MANIFEST, Path::new("/skills/demo"))],
            Vec::new(),
        )
    }

    /// Drive a wizard from SelectSkill to Confirm with the given inputs.
    fn advance_to_confirm(w: &mut Wizard, secret: &str, base: &str) {
        w.handle_key(key(KeyCode::Enter));
        type_text(w, secret);
        w.handle_key(key(KeyCode::Enter));
        type_text(w, base);
        w.handle_key(key(KeyCode::Enter));
        assert!(matches!(w.mode(), Mode::Confirm));
    }

    #[test]
    fn selecting_a_skill_enters_configuration() {
        let mut w = secret_wizard();
        w.handle_key(key(KeyCode::Enter));
        match w.mode() {
            Mode::ConfigureVariables { inputs, focus } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(*focus, 0);
                assert!(inputs[0].is_secret());
            }
            other => panic!("expected ConfigureVariables, got {other:?}"),
        }
    }

    #[test]
    fn selecting_an_error_entry_surfaces_the_reason() {
        let mut w = wizard_with(
            Vec::new(),
            vec![SkillError {
                name: "broken".into(),
                path: PathBuf::from("/skills/broken"),
                reason: "invalid skill.toml".into(),
            }],
        );
        w.handle_key(key(KeyCode::Enter));
        assert!(matches!(w.mode(), Mode::SelectSkill { .. }));
        assert_eq!(w.error(), Some("invalid skill.toml"));
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut w = secret_wizard();
        w.handle_key(key(KeyCode::Up));
        w.handle_key(key(KeyCode::Down));
        w.handle_key(key(KeyCode::Down));
        match w.mode() {
            Mode::SelectSkill { cursor } => assert_eq!(*cursor, 0),
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn required_variable_blocks_advance_with_label_in_error() {
        let mut w = secret_wizard();
        w.handle_key(key(KeyCode::Enter));

        // Secret left blank: advance is rejected, error names the label.
        w.handle_key(key(KeyCode::Enter));
        assert!(matches!(w.mode(), Mode::ConfigureVariables { .. }));
        assert_eq!(w.error(), Some("API Key is required"));
    }

    #[test]
    fn zero_variable_manifest_advances_immediately() {
        let mut w = wizard_with(
            vec![manifest_from(
                "name = \"bare\"\ndescription = \"d\"\n",
                Path::new("/skills/bare"),
            )],
            Vec::new(),
        );
        w.handle_key(key(KeyCode::Enter));
        w.handle_key(key(KeyCode::Enter));
        assert!(matches!(w.mode(), Mode::ConfigureDeployTarget { .. }));
    }

    #[test]
    fn filling_the_secret_advances_and_prefills_skill_name() {
        let mut w = secret_wizard();
        w.handle_key(key(KeyCode::Enter));
        type_text(&mut w, "sk-secret-token");
        w.handle_key(key(KeyCode::Enter));

        match w.mode() {
            Mode::ConfigureDeployTarget { inputs, .. } => {
                assert_eq!(inputs[1].value(), "demo");
            }
            other => panic!("expected ConfigureDeployTarget, got {other:?}"),
        }
    }

    #[test]
    fn backing_out_keeps_entered_values() {
        let mut w = secret_wizard();
        w.handle_key(key(KeyCode::Enter));
        type_text(&mut w, "sk-token");
        w.handle_key(key(KeyCode::Esc));
        assert!(matches!(w.mode(), Mode::SelectSkill { .. }));

        // Re-entering seeds the field from the saved value.
        w.handle_key(key(KeyCode::Enter));
        match w.mode() {
            Mode::ConfigureVariables { inputs, .. } => {
                assert_eq!(inputs[0].value(), "sk-token");
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn empty_deploy_target_blocks_advance() {
        let mut w = secret_wizard();
        w.handle_key(key(KeyCode::Enter));
        type_text(&mut w, "sk-token");
        w.handle_key(key(KeyCode::Enter));

        // Base folder blank: advance is rejected.
        w.handle_key(key(KeyCode::Enter));
        assert!(matches!(w.mode(), Mode::ConfigureDeployTarget { .. }));
        assert_eq!(w.error(), Some("Skills Folder is required"));

        // Fill the base folder but clear the pre-filled skill name.
        type_text(&mut w, "/deploy/skills");
        w.handle_key(key(KeyCode::Tab));
        for _ in 0.."demo".len() {
            w.handle_key(key(KeyCode::Backspace));
        }
        w.handle_key(key(KeyCode::Enter));
        assert!(matches!(w.mode(), Mode::ConfigureDeployTarget { .. }));
        assert_eq!(w.error(), Some("Skill Name is required"));
    }

    #[test]
    fn deploy_path_joins_base_and_name() {
        let mut w = secret_wizard();
        advance_to_confirm(&mut w, "sk-token", "/deploy/skills");
        assert_eq!(w.deploy_path(), PathBuf::from("/deploy/skills/demo"));
    }

    #[test]
    fn confirm_decline_returns_to_deploy_target() {
        let mut w = secret_wizard();
        advance_to_confirm(&mut w, "sk-token", "/deploy/skills");
        w.handle_key(key(KeyCode::Char('n')));
        assert!(matches!(w.mode(), Mode::ConfigureDeployTarget { .. }));
    }

    #[tokio::test]
    async fn existing_artifact_triggers_overwrite_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let deploy_base = tmp.path().join("skills");
        let bin_dir = deploy_base.join("demo").join("bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        std::fs::write(bin_dir.join("demo"), "old").unwrap();

        let mut w = secret_wizard();
        advance_to_confirm(&mut w, "sk-token", deploy_base.to_str().unwrap());
        w.handle_key(key(KeyCode::Char('y')));
        assert!(matches!(w.mode(), Mode::OverwriteWarning));

        // Declining falls back to Confirm.
        w.handle_key(key(KeyCode::Char('n')));
        assert!(matches!(w.mode(), Mode::Confirm));
    }

    #[tokio::test]
    async fn confirm_without_conflict_starts_building() {
        let tmp = tempfile::tempdir().unwrap();
        let mut w = secret_wizard();
        advance_to_confirm(&mut w, "sk-token", tmp.path().to_str().unwrap());
        w.handle_key(key(KeyCode::Char('y')));
        assert!(matches!(w.mode(), Mode::Building));
    }

    #[tokio::test]
    async fn build_failure_reaches_done_with_raw_output() {
        let tmp = tempfile::tempdir().unwrap();
        let mut w = secret_wizard();
        advance_to_confirm(&mut w, "sk-token", tmp.path().to_str().unwrap());
        w.handle_key(key(KeyCode::Char('y')));

        w.handle_event(WizardEvent::BuildFinished(Err(DeployError::BuildFailed {
            output: "error[E0308]: mismatched types".to_owned(),
        })));

        match w.mode() {
            Mode::Done {
                outcome: Outcome::Failed { error, build_output },
            } => {
                assert_eq!(error, "build failed");
                assert!(build_output.contains("E0308"));
            }
            other => panic!("expected Done/Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn deploy_success_reaches_done_and_restart_resets() {
        let tmp = tempfile::tempdir().unwrap();
        let mut w = secret_wizard();
        advance_to_confirm(&mut w, "sk-token", tmp.path().to_str().unwrap());
        w.handle_key(key(KeyCode::Char('y')));

        w.handle_event(WizardEvent::DeployFinished(Ok(())));
        assert!(matches!(
            w.mode(),
            Mode::Done {
                outcome: Outcome::Success
            }
        ));

        // Restart clears selection but keeps entered values.
        w.handle_key(key(KeyCode::Char('r')));
        assert!(matches!(w.mode(), Mode::SelectSkill { cursor: 0 }));
        assert!(w.selected_manifest().is_none());
        assert_eq!(w.values.get("DEMO_API_KEY").map(String::as_str), Some("sk-token"));
    }

    #[test]
    fn completion_events_outside_building_are_ignored() {
        let mut w = secret_wizard();
        w.handle_event(WizardEvent::DeployFinished(Ok(())));
        assert!(matches!(w.mode(), Mode::SelectSkill { .. }));
    }

    #[test]
    fn unhandled_keys_leave_state_unchanged() {
        let mut w = secret_wizard();
        w.handle_key(key(KeyCode::F(5)));
        assert!(matches!(w.mode(), Mode::SelectSkill { cursor: 0 }));
        assert!(w.error().is_none());
    }

    #[test]
    fn secret_preview_is_truncated() {
        let mut w = secret_wizard();
        w.handle_key(key(KeyCode::Enter));
        type_text(&mut w, "sk-very-long-secret-token");
        w.handle_key(key(KeyCode::Esc));

        let variable = w.manifests()[0].variables[0].clone();
        assert_eq!(w.preview_value(&variable), "sk-very-...");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn full_pipeline_with_fake_compiler() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let skill_dir = tmp.path().join("skill");
        std::fs::create_dir_all(&skill_dir).unwrap();

        // Fake compiler: stages a runnable artifact the deploy step can
        // introspect.
        let compiler = tmp.path().join("fake-cargo");
        std::fs::write(
            &compiler,
            "#!/bin/sh\nmkdir -p \"$4/release\"\nprintf '#!/bin/sh\\necho Usage:\\n' > \"$4/release/demo\"\nchmod 755 \"$4/release/demo\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&compiler, std::fs::Permissions::from_mode(0o755)).unwrap();

        let builder = Builder::new(tmp.path().join("dist"))
            .with_program(compiler.to_string_lossy());
        let mut w = Wizard::new(
            vec![manifest_from(SECRET_MANIFEST, &skill_dir)],
            Vec::new(),
            builder,
            "test",
        );

        let deploy_base = tmp.path().join("out");
        advance_to_confirm(&mut w, "sk-token", deploy_base.to_str().unwrap());
        w.handle_key(key(KeyCode::Char('y')));
        assert!(matches!(w.mode(), Mode::Building));

        // Drain completion events until the pipeline reaches Done.
        for _ in 0..200 {
            w.process_events();
            if matches!(w.mode(), Mode::Done { .. }) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert!(matches!(
            w.mode(),
            Mode::Done {
                outcome: Outcome::Success
            }
        ));
        assert!(deploy_base.join("demo").join("bin").join("demo").exists());
        assert!(deploy_base.join("demo").join("SKILL.md").exists());
    }
}
