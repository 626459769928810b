//! Single-party actions and script actions.

use super::{edge_labels, ProtocolStep, StepContext, StepHeader};
use crate::geometry::{action_height, Height};
use crate::html::{GridPlacement, MarkupBlock};
use crate::tikz::{contour, Endpoint, Primitive, VectorDrawing};
use crate::types::{CoordinateResolver, Face, Party};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ActionArgs {
    pub line: usize,
    pub party: Arc<Party>,
    /// May contain `\\` line breaks
    pub label: String,
    pub skip_number: bool,
    pub extra_style: Option<String>,
}

impl ActionArgs {
    pub fn new(line: usize, party: &Arc<Party>, label: impl Into<String>) -> Self {
        Self {
            line,
            party: Arc::clone(party),
            label: label.into(),
            skip_number: false,
            extra_style: None,
        }
    }
}

/// A labelled node on one party's column.
#[derive(Debug, Clone)]
pub struct Action {
    header: StepHeader,
    party: Arc<Party>,
    label: String,
    node_name: String,
    height: Height,
}

impl Action {
    pub fn new(args: ActionArgs, ctx: &mut StepContext) -> Self {
        let header = ctx.header(args.line, args.skip_number, args.extra_style);
        let node_name = ctx.fresh_node_name();
        let height = action_height(&args.label, ctx.geometry());
        tracing::debug!(line = header.line, node = node_name.as_str(), "built action");
        Self {
            header,
            party: args.party,
            label: args.label,
            node_name,
            height,
        }
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The `annex_action` node shared by actions and script actions.
fn action_node(header: &StepHeader, node_name: &str, party: &Party, label: &str, resolver: &dyn CoordinateResolver) -> Primitive {
    let mut options = vec!["annex_action".to_string(), format!("name={}", node_name)];
    if let Some(extra) = &header.extra_style {
        options.push(extra.clone());
    }
    Primitive::Node {
        options,
        at: resolver.resolve(party.column, header.line),
        text: format!("{}{}", header.tex_id(), contour(label)),
    }
}

fn action_markup(step_type: &str, header: &StepHeader, party: &Party, label: &str, height: Height) -> MarkupBlock {
    MarkupBlock {
        step_type: step_type.to_string(),
        html_rtl: false,
        html_id: header.html_id(),
        html_text: label.to_string(),
        height,
        placement: GridPlacement::cell(party.annexid, header.line),
        bands: Vec::new(),
    }
}

impl ProtocolStep for Action {
    fn step_type(&self) -> &str {
        "action"
    }

    fn header(&self) -> &StepHeader {
        &self.header
    }

    fn affected_parties(&self) -> Vec<&Party> {
        vec![&*self.party]
    }

    fn height(&self) -> Height {
        self.height
    }

    fn node_name(&self) -> Option<&str> {
        Some(self.node_name.as_str())
    }

    fn draw_vector(&self, resolver: &dyn CoordinateResolver) -> VectorDrawing {
        VectorDrawing {
            nodes: vec![action_node(&self.header, &self.node_name, &self.party, &self.label, resolver)],
            connectors: Vec::new(),
        }
    }

    fn layout_markup(&self) -> Option<MarkupBlock> {
        Some(action_markup(self.step_type(), &self.header, &self.party, &self.label, self.height))
    }
}

#[derive(Debug, Clone)]
pub struct ScriptActionArgs {
    pub line: usize,
    pub src: Arc<Party>,
    pub dest: Arc<Party>,
    pub label: String,
    /// Text on the connector arrow
    pub data: String,
    pub reversed: bool,
    pub skip_number: bool,
    pub extra_style: Option<String>,
}

impl ScriptActionArgs {
    pub fn new(line: usize, src: &Arc<Party>, dest: &Arc<Party>, label: impl Into<String>) -> Self {
        Self {
            line,
            src: Arc::clone(src),
            dest: Arc::clone(dest),
            label: label.into(),
            data: String::new(),
            reversed: false,
            skip_number: false,
            extra_style: None,
        }
    }

    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }
}

/// An action on `src` that also sends something to `dest`.
#[derive(Debug, Clone)]
pub struct ScriptAction {
    header: StepHeader,
    src: Arc<Party>,
    dest: Arc<Party>,
    label: String,
    data: String,
    reversed: bool,
    node_name: String,
    height: Height,
}

impl ScriptAction {
    pub fn new(args: ScriptActionArgs, ctx: &mut StepContext) -> Self {
        let header = ctx.header(args.line, args.skip_number, args.extra_style);
        let node_name = ctx.fresh_node_name();
        let height = Height::centered(ctx.geometry().script_action);
        tracing::debug!(line = header.line, node = node_name.as_str(), "built script action");
        Self {
            header,
            src: args.src,
            dest: args.dest,
            label: args.label,
            data: args.data,
            reversed: args.reversed,
            node_name,
            height,
        }
    }

    /// The acting party, always `src`
    pub fn party(&self) -> &Party {
        &self.src
    }

    pub fn src(&self) -> &Party {
        &self.src
    }

    pub fn dest(&self) -> &Party {
        &self.dest
    }

    pub fn reversed(&self) -> bool {
        self.reversed
    }

    /// Face of the action node the arrow leaves from.
    pub fn direction(&self) -> Face {
        if self.src.column < self.dest.column {
            Face::East
        } else {
            Face::West
        }
    }
}

impl ProtocolStep for ScriptAction {
    /// Shares the `action` type, so action styles and markup classes apply.
    fn step_type(&self) -> &str {
        "action"
    }

    fn header(&self) -> &StepHeader {
        &self.header
    }

    fn affected_parties(&self) -> Vec<&Party> {
        vec![&*self.src, &*self.src, &*self.dest]
    }

    fn height(&self) -> Height {
        self.height
    }

    fn node_name(&self) -> Option<&str> {
        Some(self.node_name.as_str())
    }

    fn draw_vector(&self, resolver: &dyn CoordinateResolver) -> VectorDrawing {
        let style = if self.reversed {
            "annex_script_action_arrow_reversed"
        } else {
            "annex_script_action_arrow"
        };
        // The node already carries the step id.
        let unnumbered = StepHeader {
            number: None,
            ..self.header.clone()
        };
        let arrow = Primitive::Segment {
            style: style.to_string(),
            offset: None,
            extra_style: self.header.extra_style.clone(),
            from: Endpoint::Face(self.node_name.clone(), self.direction()),
            to: Endpoint::Anchor(resolver.resolve(self.dest.column, self.header.line)),
            labels: edge_labels(&unnumbered, self.step_type(), &self.data, "", true),
        };
        VectorDrawing {
            nodes: vec![action_node(&self.header, &self.node_name, &self.src, &self.label, resolver)],
            connectors: vec![Primitive::Comment("draw script action arrow".to_string()), arrow],
        }
    }

    fn layout_markup(&self) -> Option<MarkupBlock> {
        Some(action_markup(self.step_type(), &self.header, &self.src, &self.label, self.height))
    }
}
