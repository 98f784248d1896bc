//! Rendering functions for the wizard layout.
//!
//! The layout is three vertically stacked areas:
//!
//! 1. **Header** (1 line) -- app name, version.
//! 2. **Body** (fills remaining space) -- the active wizard screen.
//! 3. **Footer** (2 lines) -- inline error plus key hints for the screen.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::input::TextField;
use crate::wizard::{Mode, Outcome, Wizard};

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn label_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn normal_style() -> Style {
    Style::default().fg(Color::White)
}

fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

fn success_style() -> Style {
    Style::default().fg(Color::Green)
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Draw the entire wizard frame.
pub fn draw(frame: &mut Frame, wizard: &Wizard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(1),    // body
            Constraint::Length(2), // error + help
        ])
        .split(frame.area());

    draw_header(frame, wizard, chunks[0]);
    draw_body(frame, wizard, chunks[1]);
    draw_footer(frame, wizard, chunks[2]);
}

fn draw_header(frame: &mut Frame, wizard: &Wizard, area: Rect) {
    let header = Line::from(vec![
        Span::styled(" SkillForge ", title_style()),
        Span::styled(wizard.version(), muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(header).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}

fn draw_body(frame: &mut Frame, wizard: &Wizard, area: Rect) {
    let lines = match wizard.mode() {
        Mode::SelectSkill { cursor } => render_skill_list(wizard, *cursor),
        Mode::ConfigureVariables { inputs, focus } => {
            let variables = wizard
                .selected_manifest()
                .map(|m| m.variables.as_slice())
                .unwrap_or_default();
            render_inputs("Step 1: Skill Environment", inputs, *focus, variables)
        }
        Mode::ConfigureDeployTarget { inputs, focus } => {
            render_inputs("Step 2: Deploy Settings", inputs.as_slice(), *focus, &[])
        }
        Mode::Confirm => render_confirm(wizard),
        Mode::OverwriteWarning => render_overwrite(wizard),
        Mode::Building => render_building(wizard),
        Mode::Done { outcome } => render_done(wizard, outcome),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(muted_style());
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_footer(frame: &mut Frame, wizard: &Wizard, area: Rect) {
    let mut lines = Vec::new();
    if let Some(error) = wizard.error() {
        lines.push(Line::from(Span::styled(
            format!("✗ {error}"),
            error_style(),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        key_hints(wizard.mode()),
        muted_style(),
    )));
    frame.render_widget(Paragraph::new(lines), area);
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

fn render_skill_list(wizard: &Wizard, cursor: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled("Available Skills", label_style())),
        Line::from(""),
    ];

    if wizard.manifests().is_empty() && wizard.skill_errors().is_empty() {
        lines.push(Line::from(Span::styled(
            "  No skills found — add a skill.toml to register one",
            muted_style(),
        )));
        return lines;
    }

    for (i, manifest) in wizard.manifests().iter().enumerate() {
        let (prefix, style) = if i == cursor {
            ("▸ ", title_style())
        } else {
            ("  ", normal_style())
        };
        lines.push(Line::from(vec![
            Span::raw(prefix),
            Span::styled(manifest.name.clone(), style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", manifest.description),
            muted_style(),
        )));
    }

    if !wizard.skill_errors().is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Skills with Errors",
            error_style(),
        )));
        lines.push(Line::from(""));

        for (i, err) in wizard.skill_errors().iter().enumerate() {
            let idx = wizard.manifests().len() + i;
            let (prefix, style) = if idx == cursor {
                ("▸ ", error_style())
            } else {
                ("  ", muted_style())
            };
            lines.push(Line::from(vec![
                Span::raw(prefix),
                Span::styled(err.name.clone(), style),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {}", err.reason),
                muted_style(),
            )));
        }
    }

    lines
}

fn render_inputs(
    title: &str,
    inputs: &[TextField],
    focus: usize,
    variables: &[skillforge_manifest::Variable],
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(title.to_owned(), label_style())),
        Line::from(""),
    ];

    for (i, input) in inputs.iter().enumerate() {
        let (prefix, style) = if i == focus {
            ("▸ ", label_style())
        } else {
            ("  ", muted_style())
        };

        // Deploy-target fields carry no variable entry and are always
        // required; variable fields mark required-ness from the manifest.
        let required = variables.get(i).is_none_or(|v| v.required);
        let label = if required {
            format!("{} *", input.label())
        } else {
            input.label().to_owned()
        };
        lines.push(Line::from(vec![
            Span::raw(prefix),
            Span::styled(label, style),
        ]));

        let value_line = if input.is_empty() && !input.placeholder().is_empty() {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(input.placeholder().to_owned(), muted_style()),
            ])
        } else {
            let shown = input.display();
            let caret = if i == focus { "█" } else { "" };
            Line::from(vec![
                Span::raw("  "),
                Span::styled(shown, normal_style()),
                Span::styled(caret, label_style()),
            ])
        };
        lines.push(value_line);
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled("  * required", muted_style())));
    lines
}

fn render_confirm(wizard: &Wizard) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled("Step 3: Confirm", label_style())),
        Line::from(""),
    ];

    if let Some(manifest) = wizard.selected_manifest() {
        lines.push(Line::from(vec![
            Span::styled("  Skill:         ", muted_style()),
            Span::styled(manifest.name.clone(), normal_style()),
        ]));
        lines.push(Line::from(""));

        if !manifest.variables.is_empty() {
            lines.push(Line::from(Span::styled("  Environment:", muted_style())));
            for v in &manifest.variables {
                lines.push(Line::from(vec![
                    Span::styled(format!("    {:<14} ", format!("{}:", v.label)), muted_style()),
                    Span::styled(wizard.preview_value(v), normal_style()),
                ]));
            }
            lines.push(Line::from(""));
        }
    }

    lines.push(Line::from(Span::styled("  Deploy:", muted_style())));
    lines.push(Line::from(vec![
        Span::styled("    Skills Folder: ", muted_style()),
        Span::styled(wizard.base_folder().to_owned(), normal_style()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("    Skill Name:    ", muted_style()),
        Span::styled(wizard.folder_name().to_owned(), normal_style()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("    Target:        ", muted_style()),
        Span::styled(wizard.deploy_path().display().to_string(), success_style()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Build and deploy this skill?",
        normal_style(),
    )));

    lines
}

fn render_overwrite(wizard: &Wizard) -> Vec<Line<'static>> {
    let skill_name = wizard
        .selected_manifest()
        .map(|m| m.name.clone())
        .unwrap_or_else(|| "skill".to_owned());

    vec![
        Line::from(Span::styled("⚠ Skill already exists", error_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  The skill \"", muted_style()),
            Span::styled(skill_name, normal_style()),
            Span::styled("\" already exists at:", muted_style()),
        ]),
        Line::from(Span::styled(
            format!("  {}", wizard.deploy_path().display()),
            normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled("  Overwrite?", normal_style())),
    ]
}

fn render_building(wizard: &Wizard) -> Vec<Line<'static>> {
    let skill_name = wizard
        .selected_manifest()
        .map(|m| m.name.clone())
        .unwrap_or_else(|| "skill".to_owned());

    vec![
        Line::from(Span::styled("Building...", label_style())),
        Line::from(""),
        Line::from(Span::styled(
            format!("  Compiling {skill_name}..."),
            muted_style(),
        )),
    ]
}

fn render_done(wizard: &Wizard, outcome: &Outcome) -> Vec<Line<'static>> {
    match outcome {
        Outcome::Success => vec![
            Line::from(Span::styled(
                "✓ Skill deployed successfully!",
                success_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Deployed to: ", muted_style()),
                Span::styled(wizard.deploy_path().display().to_string(), normal_style()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  The skill is now ready to use!",
                muted_style(),
            )),
        ],
        Outcome::Failed { error, build_output } => {
            let mut lines = vec![
                Line::from(Span::styled("✗ Build/Deploy failed", error_style())),
                Line::from(""),
                Line::from(Span::styled(format!("  {error}"), normal_style())),
            ];
            if !build_output.is_empty() {
                lines.push(Line::from(""));
                for out_line in build_output.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("  {out_line}"),
                        muted_style(),
                    )));
                }
            }
            lines
        }
    }
}

/// Key hints for the footer, per screen.
fn key_hints(mode: &Mode) -> &'static str {
    match mode {
        Mode::SelectSkill { .. } => "↑/↓: Navigate • Enter: Select • q: Quit",
        Mode::ConfigureVariables { .. } | Mode::ConfigureDeployTarget { .. } => {
            "↑/↓/Tab: Navigate • Enter: Next Step • Esc: Back"
        }
        Mode::Confirm => "Y/Enter: Build & Deploy • N/Esc: Back",
        Mode::OverwriteWarning => "Y: Overwrite • N/Esc: Cancel",
        Mode::Building => "Building...",
        Mode::Done { .. } => "Enter/q: Quit • R: Configure another skill",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
