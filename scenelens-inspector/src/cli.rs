/**
 * TERMINAL FRONT END - line commands over an `Inspector`
 *
 * Lines are split with shell quoting rules, so `set width ""` clears a
 * property and `new "wide cards"` names a session with a space in it.
 * Connect, disconnect and quit are handled by the caller because they need
 * to open or drop a transport.
 */

use crate::inspector::{Inspector, InspectorError, Refresh, SwitchPolicy};
use crate::present::filters::{color_value, VECTOR_LABELS, VECTOR_STEP};
use crate::present::{
    change_summary, filter_sections, parse_input, property_sections, FieldKind, FilterSection, PropertySection,
    TreeRow, TreeState, UniformControl,
};
use crate::store::KeyValueStore;
use scenelens_protocol::{Transport, UniformValue};
use std::fmt::Write as _;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  tree                         show the hierarchy
  toggle <id>                  expand or collapse a node
  select [<id>]                select (and highlight) a node, or clear
  hover [<id>]                 highlight a node, or return to the selection
  outline <id>                 highlight a node and its children
  show                         properties and filters of the selection
  set <prop> <value>           edit a property of the selection (\"\" clears)
  layout on|off                toggle layout participation of the selection
  uniform <filter> <group> <name> <value...>
                               edit a filter uniform (numbers, true/false or #rrggbb)
  reset | reset-all            push originals back for the selection / every node
  changes                      list recorded changes
  sessions                     list saved sessions
  save | new <name>            save the active session / save as a new one
  switch <name> [--save|--discard]
  delete <name>
  autosave on|off
  refresh | copy-layout
  status | connect | disconnect | help | quit";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot parse line: {0}")]
    Parse(#[from] shell_words::ParseError),
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Tree,
    Toggle(String),
    Select(Option<String>),
    Hover(Option<String>),
    Outline(String),
    Show,
    Set { property: String, raw: String },
    Layout(bool),
    Uniform {
        filter_index: usize,
        group: String,
        name: String,
        raw: Vec<String>,
    },
    Reset,
    ResetAll,
    Changes,
    Sessions,
    Save,
    New(String),
    Switch { name: String, policy: Option<SwitchPolicy> },
    Delete(String),
    Autosave(bool),
    Refresh,
    CopyLayout,
    Status,
    Connect,
    Disconnect,
    Help,
    Quit,
}

fn on_off(word: Option<&str>, usage: &'static str) -> Result<bool, CliError> {
    match word {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        _ => Err(CliError::Usage(usage)),
    }
}

impl Command {
    /// `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Command>, CliError> {
        let words = shell_words::split(line)?;
        let Some((head, args)) = words.split_first() else {
            return Ok(None);
        };
        let arg = |i: usize| args.get(i).map(String::as_str);
        let required = |i: usize, usage: &'static str| arg(i).map(str::to_string).ok_or(CliError::Usage(usage));

        let command = match head.as_str() {
            "tree" => Command::Tree,
            "toggle" => Command::Toggle(required(0, "toggle <id>")?),
            "select" => Command::Select(arg(0).map(str::to_string)),
            "hover" => Command::Hover(arg(0).map(str::to_string)),
            "outline" => Command::Outline(required(0, "outline <id>")?),
            "show" => Command::Show,
            "set" => Command::Set {
                property: required(0, "set <prop> <value>")?,
                raw: required(1, "set <prop> <value>")?,
            },
            "layout" => Command::Layout(on_off(arg(0), "layout on|off")?),
            "uniform" => {
                const USAGE: &str = "uniform <filter> <group> <name> <value...>";
                if args.len() < 4 {
                    return Err(CliError::Usage(USAGE));
                }
                Command::Uniform {
                    filter_index: args[0].parse().map_err(|_| CliError::Usage(USAGE))?,
                    group: args[1].clone(),
                    name: args[2].clone(),
                    raw: args[3..].to_vec(),
                }
            }
            "reset" => Command::Reset,
            "reset-all" => Command::ResetAll,
            "changes" => Command::Changes,
            "sessions" => Command::Sessions,
            "save" => Command::Save,
            "new" => Command::New(required(0, "new <name>")?),
            "switch" => {
                const USAGE: &str = "switch <name> [--save|--discard]";
                let policy = match arg(1) {
                    None => None,
                    Some("--save") => Some(SwitchPolicy::SaveFirst),
                    Some("--discard") => Some(SwitchPolicy::Discard),
                    Some(_) => return Err(CliError::Usage(USAGE)),
                };
                Command::Switch {
                    name: required(0, USAGE)?,
                    policy,
                }
            }
            "delete" => Command::Delete(required(0, "delete <name>")?),
            "autosave" => Command::Autosave(on_off(arg(0), "autosave on|off")?),
            "refresh" => Command::Refresh,
            "copy-layout" => Command::CopyLayout,
            "status" => Command::Status,
            "connect" => Command::Connect,
            "disconnect" => Command::Disconnect,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CliError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Numbers become a scalar or vector, `true`/`false` a bool, `#rrggbb` a colour
/// shaped like the uniform's current control.
pub fn parse_uniform_value(raw: &[String], control: Option<&UniformControl>) -> Option<UniformValue> {
    match raw {
        [single] if single == "true" || single == "false" => Some(UniformValue::Bool(single == "true")),
        [single] if single.starts_with('#') => {
            let plain = UniformControl::Color { hex: String::new() };
            Some(color_value(control.unwrap_or(&plain), single))
        }
        _ => {
            let numbers: Vec<f64> = raw.iter().map(|w| w.parse().ok()).collect::<Option<_>>()?;
            match numbers.len() {
                0 => None,
                1 => Some(UniformValue::Scalar(numbers[0])),
                _ => Some(UniformValue::Vector(numbers)),
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Console {
    tree: TreeState,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text to print after an inbound message, if any.
    pub fn on_refresh<T: Transport, S: KeyValueStore>(
        &mut self,
        inspector: &mut Inspector<T, S>,
        refresh: Refresh,
    ) -> Option<String> {
        let mut out = String::new();
        if let Some((name, report)) = inspector.take_reapply_report() {
            let _ = writeln!(
                out,
                "session '{name}' reapplied: {} changes, {} already live",
                report.pushes.len(),
                report.skipped
            );
        }
        match refresh {
            Refresh::Tree => {
                self.tree.expand_roots(inspector.hierarchy());
                out.push_str(&self.render_tree(inspector));
            }
            Refresh::LayoutReady => {
                if let Some(export) = inspector.layout_export() {
                    let _ = write!(out, "layout of {}:\n{}", export.id, export.json);
                }
            }
            // Values refresh silently; `show` prints the current state.
            Refresh::Values | Refresh::Nothing => {}
        }
        (!out.is_empty()).then_some(out)
    }

    pub fn execute<T: Transport, S: KeyValueStore>(
        &mut self,
        inspector: &mut Inspector<T, S>,
        command: Command,
    ) -> Result<String, InspectorError> {
        let out = match command {
            Command::Tree => self.render_tree(inspector),
            Command::Toggle(id) => {
                self.tree.toggle(&id);
                self.render_tree(inspector)
            }
            Command::Select(id) => {
                inspector.select(id.as_deref())?;
                match id {
                    Some(id) => format!("selected {id}"),
                    None => "selection cleared".to_string(),
                }
            }
            Command::Hover(id) => {
                inspector.hover(id.as_deref())?;
                String::new()
            }
            Command::Outline(id) => {
                inspector.outline_children(&id)?;
                String::new()
            }
            Command::Show => self.render_selection(inspector),
            Command::Set { property, raw } => {
                let id = selected(inspector)?;
                let value = parse_input(&property, &raw);
                if value.is_none() && !raw.trim().is_empty() {
                    return Ok(format!("'{raw}' is not a valid value for {property}"));
                }
                let outcome = inspector.edit_property(&id, &property, value)?;
                format!("{id}.{property} {outcome:?}")
            }
            Command::Layout(enabled) => {
                let id = selected(inspector)?;
                inspector.toggle_layout(&id, enabled)?;
                format!("layout {} for {id}", if enabled { "on" } else { "off" })
            }
            Command::Uniform {
                filter_index,
                group,
                name,
                raw,
            } => {
                let id = selected(inspector)?;
                let control = inspector
                    .selected_node()
                    .map(filter_sections)
                    .unwrap_or_default()
                    .into_iter()
                    .find(|section| section.index == filter_index)
                    .and_then(|section| section.rows.into_iter().find(|row| row.name == name))
                    .map(|row| row.control);
                let Some(value) = parse_uniform_value(&raw, control.as_ref()) else {
                    return Ok(format!("cannot parse uniform value {raw:?}"));
                };
                inspector.edit_filter_uniform(&id, filter_index, &group, &name, value)?;
                format!("{id} filter {filter_index} {name} updated")
            }
            Command::Reset => {
                let id = selected(inspector)?;
                format!("reset {} properties on {id}", inspector.reset_node(&id)?)
            }
            Command::ResetAll => format!("reset {} properties", inspector.reset_all()?),
            Command::Changes => {
                let entries = change_summary(inspector.engine());
                if entries.is_empty() {
                    "no changes".to_string()
                } else {
                    entries.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
                }
            }
            Command::Sessions => render_sessions(inspector),
            Command::Save => {
                let (name, saved) = inspector.save_session()?;
                format!("saved '{name}' ({} properties)", saved.properties)
            }
            Command::New(name) => {
                let saved = inspector.create_session(&name)?;
                format!("created '{}' ({} properties)", name.trim(), saved.properties)
            }
            Command::Switch { name, policy } => {
                let pending = inspector.engine().has_unsaved_changes() && !inspector.autosave();
                let policy = match (policy, inspector.active_session()) {
                    (Some(policy), _) => policy,
                    (None, Some(current)) if pending && current != name => {
                        return Ok(format!(
                            "'{current}' has unsaved changes: switch {name} --save or --discard"
                        ));
                    }
                    (None, _) => SwitchPolicy::Discard,
                };
                let loaded = inspector.switch_session(&name, policy)?;
                format!(
                    "switched to '{name}': {} changes applied, {} already live",
                    loaded.pushes.len(),
                    loaded.skipped
                )
            }
            Command::Delete(name) => {
                inspector.delete_session(&name)?;
                format!("deleted '{name}'")
            }
            Command::Autosave(enabled) => {
                inspector.set_autosave(enabled)?;
                format!("autosave {}", if enabled { "on" } else { "off" })
            }
            Command::Refresh => {
                inspector.refresh()?;
                String::new()
            }
            Command::CopyLayout => {
                let id = selected(inspector)?;
                inspector.request_layout(&id)?;
                format!("layout of {id} requested")
            }
            Command::Status => render_status(inspector),
            Command::Help => HELP.to_string(),
            Command::Connect | Command::Disconnect | Command::Quit => String::new(),
        };
        Ok(out)
    }

    pub fn render_tree<T: Transport, S: KeyValueStore>(&self, inspector: &Inspector<T, S>) -> String {
        let rows = self.tree.rows(
            inspector.hierarchy(),
            &inspector.engine().changed_node_ids(),
            inspector.selected_id(),
        );
        if rows.is_empty() {
            return "(no hierarchy)".to_string();
        }
        rows.iter().map(render_row).collect::<Vec<_>>().join("\n")
    }

    fn render_selection<T: Transport, S: KeyValueStore>(&self, inspector: &Inspector<T, S>) -> String {
        let Some(node) = inspector.selected_node() else {
            return "nothing selected".to_string();
        };
        let mut out = format!("{} ({})", node.id, node.class_name);
        if inspector.engine().node_changes(&node.id).is_some() {
            out.push_str("  [changed, 'reset' to restore]");
        }
        let _ = write!(out, "\nlayout enabled: {}", node.layout_enabled);
        for section in property_sections(inspector.engine(), node) {
            out.push('\n');
            out.push_str(&render_properties(&section));
        }
        for section in filter_sections(node) {
            out.push('\n');
            out.push_str(&render_filter(&section));
        }
        out
    }
}

fn selected<T: Transport, S: KeyValueStore>(inspector: &Inspector<T, S>) -> Result<String, InspectorError> {
    inspector.selected_id().map(str::to_string).ok_or(InspectorError::NoSelection)
}

fn render_row(row: &TreeRow) -> String {
    let marker = match (row.has_children, row.expanded) {
        (false, _) => ' ',
        (true, true) => '▼',
        (true, false) => '▶',
    };
    let cursor = if row.selected { '>' } else { ' ' };
    let badges = row.badges();
    let mut line = format!("{cursor}{}{marker} {} ({})", "  ".repeat(row.depth), row.label, row.class_name);
    if !badges.is_empty() {
        let _ = write!(line, "  {badges}");
    }
    line
}

fn render_properties(section: &PropertySection) -> String {
    let mut out = format!("[{}]", section.title);
    for row in &section.rows {
        let hint = match row.kind {
            FieldKind::Select(options) => format!(" <{}>", options.join("|")),
            FieldKind::Number { step } if step < 1.0 => format!(" (step {step})"),
            _ => String::new(),
        };
        let value = row.value_text();
        let value = if value.is_empty() { "(not set)".to_string() } else { value };
        let _ = write!(out, "\n  {:<16}{value}{hint}", row.label);
        let status = row.status_text();
        if !status.is_empty() {
            let _ = write!(out, "  [{status}]");
        }
    }
    out
}

fn render_filter(section: &FilterSection) -> String {
    let mut out = format!("[filter {}: {}]", section.index, section.class_name);
    for row in &section.rows {
        let control = match &row.control {
            UniformControl::Slider { min, max, step, value } => format!("{value} (slider {min}..{max}, step {step})"),
            UniformControl::Color { hex } => format!("colour {hex}"),
            UniformControl::ColorAlpha { hex, alpha } => format!("colour {hex} alpha {alpha}"),
            UniformControl::Vector { components } => components
                .iter()
                .zip(VECTOR_LABELS)
                .map(|(v, label)| format!("{label}={v}"))
                .collect::<Vec<_>>()
                .join(" ")
                + &format!(" (step {VECTOR_STEP})"),
            UniformControl::Checkbox(b) => format!("[{}]", if *b { "x" } else { " " }),
            UniformControl::ReadOnly(json) => format!("{json} (read-only)"),
        };
        let _ = write!(out, "\n  {:<16}{control}  {}/{}", row.display_name, row.group_name, row.name);
    }
    out
}

fn render_sessions<T: Transport, S: KeyValueStore>(inspector: &Inspector<T, S>) -> String {
    let names = inspector.session_names();
    if names.is_empty() {
        return "no saved sessions".to_string();
    }
    let active = inspector.active_session();
    names
        .iter()
        .map(|name| {
            if active.as_deref() == Some(name.as_str()) {
                format!("* {name}")
            } else {
                format!("  {name}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_status<T: Transport, S: KeyValueStore>(inspector: &Inspector<T, S>) -> String {
    format!(
        "state: {:?}\nsession: {}\nunsaved: {}\nautosave: {}\nchanges: {}",
        inspector.state(),
        inspector.active_session().unwrap_or_else(|| "(none)".to_string()),
        inspector.engine().has_unsaved_changes(),
        inspector.autosave(),
        inspector.engine().change_count()
    )
}
