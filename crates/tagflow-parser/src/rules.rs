//! Per-tag validation rules.
//!
//! Each function here takes the tag name token and its complete
//! [`AttributeBag`] and either returns the validated declaration or the
//! first diagnostic. They do not touch the symbol table or the layout.
//!
//! | Tag | Required | Optional |
//! |-----|----------|----------|
//! | `process` | `name` | |
//! | `subprocess` | `id` | `name` |
//! | `starter`, `wait`, `mail` | `id` | `points` (one target), `row` |
//! | `task` | `id` | `name`, `points` (one target), `row` |
//! | `gateway` | `id` | `points` (up to three targets), `up`, `mid`, `down` |
//! | `end` | `id` | |

use tagflow_core::{
    identifier::QualifiedName,
    semantic::{EventKind, RowSlot, TargetSlot, Targets, UnknownVariant},
};

use crate::{
    attributes::{Attribute, AttributeBag},
    error::{Diagnostic, ErrorCode},
    tokens::Token,
};

const PROCESS_ATTRIBUTES: &[&str] = &["name"];
const SUBPROCESS_ATTRIBUTES: &[&str] = &["id", "name"];

/// Attributes accepted by each event kind.
pub fn event_attributes(kind: EventKind) -> &'static [&'static str] {
    match kind {
        EventKind::Starter | EventKind::Wait | EventKind::Mail => &["id", "points", "row"],
        EventKind::Task => &["id", "name", "points", "row"],
        EventKind::Gateway => &["id", "points", "up", "mid", "down"],
        EventKind::End => &["id"],
    }
}

/// A validated `<subprocess>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubprocessHeader {
    id: String,
    display_name: String,
}

impl SubprocessHeader {
    /// Namespace of the events inside the subprocess.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The `name` attribute, or the id when it is absent or empty.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// A validated event tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDecl {
    kind: EventKind,
    id: String,
    title: String,
    row: RowSlot,
    targets: Targets,
}

impl EventDecl {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The raw `id`, not yet qualified.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn row(&self) -> RowSlot {
        self.row
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    pub fn into_parts(self) -> (EventKind, String, String, RowSlot, Targets) {
        (self.kind, self.id, self.title, self.row, self.targets)
    }
}

/// Validates `<process>` and returns the document title.
pub fn process_title(tag: &Token, bag: &AttributeBag) -> Result<String, Diagnostic> {
    bag.check_allowed(tag, PROCESS_ATTRIBUTES)?;
    Ok(bag.require(tag, "name")?.value().to_string())
}

/// Validates `<subprocess>`.
pub fn subprocess_header(
    tag: &Token,
    bag: &AttributeBag,
) -> Result<SubprocessHeader, Diagnostic> {
    bag.check_allowed(tag, SUBPROCESS_ATTRIBUTES)?;
    let id = non_empty(bag.require(tag, "id")?)?.to_string();
    let display_name = bag
        .value("name")
        .filter(|name| !name.is_empty())
        .unwrap_or(id.as_str())
        .to_string();
    Ok(SubprocessHeader { id, display_name })
}

/// Maps an event tag name to its kind (`E203` if it is not one).
pub fn event_kind(tag: &Token) -> Result<EventKind, Diagnostic> {
    tag.text().parse().map_err(|err: UnknownVariant| {
        Diagnostic::error(err.to_string())
            .with_code(ErrorCode::E203)
            .at(tag.location())
            .with_label(tag.span(), ErrorCode::E203.description())
            .with_help("expected one of: starter, task, gateway, wait, mail, end")
    })
}

/// Validates an event tag. Targets are qualified against `namespace`.
pub fn event_decl(
    tag: &Token,
    bag: &AttributeBag,
    namespace: &str,
) -> Result<EventDecl, Diagnostic> {
    let kind = event_kind(tag)?;
    bag.check_allowed(tag, event_attributes(kind))?;

    let id = non_empty(bag.require(tag, "id")?)?.to_string();

    let row = match bag.get("row") {
        Some(attr) => parse_row(attr)?,
        None => RowSlot::default(),
    };

    let title = bag.value("name").unwrap_or_default().to_string();

    let targets = match kind {
        EventKind::Gateway => gateway_targets(bag, namespace)?,
        _ => single_target(kind, bag, namespace)?,
    };

    Ok(EventDecl {
        kind,
        id,
        title,
        row,
        targets,
    })
}

fn non_empty(attr: &Attribute) -> Result<&str, Diagnostic> {
    if attr.value().trim().is_empty() {
        return Err(attr.invalid_value(
            ErrorCode::E202,
            format!("attribute `{}` must not be empty", attr.name()),
        ));
    }
    Ok(attr.value())
}

fn parse_row(attr: &Attribute) -> Result<RowSlot, Diagnostic> {
    attr.value().parse().map_err(|err: UnknownVariant| {
        attr.invalid_value(ErrorCode::E202, err.to_string())
            .with_help("use `up`, `mid` or `down`")
    })
}

fn target_name(
    attr: &Attribute,
    raw: &str,
    namespace: &str,
) -> Result<QualifiedName, Diagnostic> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(attr.invalid_value(
            ErrorCode::E202,
            format!("empty target in `{}`", attr.name()),
        ));
    }
    Ok(QualifiedName::qualify(namespace, raw))
}

fn single_target(
    kind: EventKind,
    bag: &AttributeBag,
    namespace: &str,
) -> Result<Targets, Diagnostic> {
    let mut targets = Targets::new();
    if let Some(attr) = bag.get("points") {
        if attr.value().contains(',') {
            return Err(attr
                .invalid_value(
                    ErrorCode::E206,
                    format!("`{kind}` accepts a single target"),
                )
                .with_help("only `gateway` can point to several events"));
        }
        targets.set(TargetSlot::Mid, target_name(attr, attr.value(), namespace)?);
    }
    Ok(targets)
}

fn gateway_targets(bag: &AttributeBag, namespace: &str) -> Result<Targets, Diagnostic> {
    let mut targets = Targets::new();
    let points = bag.get("points");

    if let Some(attr) = points {
        let parts: Vec<_> = attr.value().split(',').collect();
        if parts.len() > TargetSlot::ALL.len() {
            return Err(attr
                .invalid_value(
                    ErrorCode::E206,
                    format!(
                        "`gateway` accepts at most three targets, found {}",
                        parts.len()
                    ),
                )
                .with_help("targets map to the up, mid and down slots in order"));
        }
        for (slot, raw) in TargetSlot::ALL.into_iter().zip(parts) {
            targets.set(slot, target_name(attr, raw, namespace)?);
        }
    }

    for slot in TargetSlot::ALL {
        let Some(attr) = bag.get(slot.as_str()) else {
            continue;
        };
        if attr.value().contains(',') {
            return Err(attr.invalid_value(
                ErrorCode::E206,
                format!("slot `{slot}` accepts a single target"),
            ));
        }
        let target = target_name(attr, attr.value(), namespace)?;
        if targets.get(slot).is_some() {
            let mut diagnostic = Diagnostic::error(format!(
                "gateway slot `{slot}` is given both in `points` and as `{slot}`"
            ))
            .with_code(ErrorCode::E207)
            .at(attr.name_location())
            .with_label(attr.name_span(), "second target for this slot");
            if let Some(points) = points {
                diagnostic =
                    diagnostic.with_secondary_label(points.value_span(), "first given here");
            }
            return Err(diagnostic);
        }
        targets.set(slot, target);
    }

    Ok(targets)
}
