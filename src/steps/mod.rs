//! Protocol steps - one typed value per diagram row.
//!
//! Every step is built once through a [`StepContext`], which hands out
//! sequence numbers and node names and remembers named requests for replies.
//! After construction a step is immutable: both backends read the same
//! derived fields.

mod action;
mod party;
mod request;

pub use action::{Action, ActionArgs, ScriptAction, ScriptActionArgs};
pub use party::{DummyParty, Lifecycle, LifecycleArgs, LifecycleKind, WindowArgs, WindowKind, WindowLifecycle};
pub use request::{Exchange, HttpMessage, HttpReply, Request, RequestArgs, RequestKind};

use crate::config::GeometryConfig;
use crate::geometry::Height;
use crate::html::MarkupBlock;
use crate::tikz::{contour, EdgeLabel, LabelSide, VectorDrawing};
use crate::types::{CoordinateResolver, Party};
use std::collections::HashMap;
use std::sync::Arc;

/// Fields every step carries.
#[derive(Debug, Clone, PartialEq)]
pub struct StepHeader {
    pub line: usize,
    /// Display index, `None` when the step skips numbering
    pub number: Option<usize>,
    pub extra_style: Option<String>,
}

impl StepHeader {
    pub fn skip_number(&self) -> bool {
        self.number.is_none()
    }

    pub fn tex_id(&self) -> String {
        match self.number {
            Some(n) => format!("\\annexstepid{{{}}}", n),
            None => String::new(),
        }
    }

    pub fn html_id(&self) -> String {
        match self.number {
            Some(n) => format!(r#"<span class="step_id">{}</span>"#, n),
            None => String::new(),
        }
    }
}

/// Per-diagram construction state.
#[derive(Debug, Default)]
pub struct StepContext {
    geometry: GeometryConfig,
    numbers: usize,
    nodes: usize,
    requests: HashMap<String, (Arc<Party>, Arc<Party>)>,
}

impl StepContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geometry(geometry: GeometryConfig) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// A diagram-unique node name.
    pub fn fresh_node_name(&mut self) -> String {
        self.nodes += 1;
        format!("annex_node_{}", self.nodes)
    }

    pub(crate) fn header(&mut self, line: usize, skip_number: bool, extra_style: Option<String>) -> StepHeader {
        let number = if skip_number {
            None
        } else {
            self.numbers += 1;
            Some(self.numbers)
        };
        StepHeader {
            line,
            number,
            extra_style: extra_style.filter(|s| !s.is_empty()),
        }
    }

    pub(crate) fn register_request(&mut self, name: String, src: Arc<Party>, dest: Arc<Party>) {
        self.requests.insert(name, (src, dest));
    }

    pub(crate) fn request_endpoints(&self, name: &str) -> Option<(Arc<Party>, Arc<Party>)> {
        self.requests.get(name).cloned()
    }
}

/// The contract shared by all step variants.
pub trait ProtocolStep {
    /// Type tag; drawing styles are namespaced as `annex_<type>`
    fn step_type(&self) -> &str;

    fn header(&self) -> &StepHeader;

    /// Parties this step touches, used upstream to reserve columns.
    fn affected_parties(&self) -> Vec<&Party>;

    fn height(&self) -> Height;

    /// Name of the node this step introduces, if any
    fn node_name(&self) -> Option<&str> {
        None
    }

    fn draw_vector(&self, resolver: &dyn CoordinateResolver) -> VectorDrawing;

    fn layout_markup(&self) -> Option<MarkupBlock>;
}

impl<T: ProtocolStep + ?Sized> ProtocolStep for Box<T> {
    fn step_type(&self) -> &str {
        (**self).step_type()
    }
    fn header(&self) -> &StepHeader {
        (**self).header()
    }
    fn affected_parties(&self) -> Vec<&Party> {
        (**self).affected_parties()
    }
    fn height(&self) -> Height {
        (**self).height()
    }
    fn node_name(&self) -> Option<&str> {
        (**self).node_name()
    }
    fn draw_vector(&self, resolver: &dyn CoordinateResolver) -> VectorDrawing {
        (**self).draw_vector(resolver)
    }
    fn layout_markup(&self) -> Option<MarkupBlock> {
        (**self).layout_markup()
    }
}

/// The built-in step variants.
#[derive(Debug, Clone)]
pub enum Step {
    Request(Request),
    Action(Action),
    ScriptAction(ScriptAction),
    Lifecycle(Lifecycle),
    Window(WindowLifecycle),
    Dummy(DummyParty),
}

macro_rules! delegate {
    ($self:ident, $s:ident => $e:expr) => {
        match $self {
            Step::Request($s) => $e,
            Step::Action($s) => $e,
            Step::ScriptAction($s) => $e,
            Step::Lifecycle($s) => $e,
            Step::Window($s) => $e,
            Step::Dummy($s) => $e,
        }
    };
}

impl ProtocolStep for Step {
    fn step_type(&self) -> &str {
        delegate!(self, s => s.step_type())
    }
    fn header(&self) -> &StepHeader {
        delegate!(self, s => s.header())
    }
    fn affected_parties(&self) -> Vec<&Party> {
        delegate!(self, s => s.affected_parties())
    }
    fn height(&self) -> Height {
        delegate!(self, s => s.height())
    }
    fn node_name(&self) -> Option<&str> {
        delegate!(self, s => s.node_name())
    }
    fn draw_vector(&self, resolver: &dyn CoordinateResolver) -> VectorDrawing {
        delegate!(self, s => s.draw_vector(resolver))
    }
    fn layout_markup(&self) -> Option<MarkupBlock> {
        delegate!(self, s => s.layout_markup())
    }
}

impl From<Request> for Step {
    fn from(s: Request) -> Self {
        Step::Request(s)
    }
}

impl From<Action> for Step {
    fn from(s: Action) -> Self {
        Step::Action(s)
    }
}

impl From<ScriptAction> for Step {
    fn from(s: ScriptAction) -> Self {
        Step::ScriptAction(s)
    }
}

impl From<Lifecycle> for Step {
    fn from(s: Lifecycle) -> Self {
        Step::Lifecycle(s)
    }
}

impl From<WindowLifecycle> for Step {
    fn from(s: WindowLifecycle) -> Self {
        Step::Window(s)
    }
}

impl From<DummyParty> for Step {
    fn from(s: DummyParty) -> Self {
        Step::Dummy(s)
    }
}

/// Label nodes for a connector. The step id goes on the side given by
/// `id_above`; a side with neither id nor text gets no node.
pub(crate) fn edge_labels(
    header: &StepHeader,
    step_type: &str,
    text_above: &str,
    text_below: &str,
    id_above: bool,
) -> Vec<EdgeLabel> {
    let style = format!("annex_{}_text", step_type);
    let tex_id = header.tex_id();
    let (id_up, id_down) = if id_above {
        (tex_id.as_str(), "")
    } else {
        ("", tex_id.as_str())
    };

    let mut labels = Vec::new();
    let above = format!("{}{}", id_up, contour(text_above));
    if !above.is_empty() {
        labels.push(EdgeLabel {
            side: LabelSide::Above,
            style: style.clone(),
            text: above,
        });
    }
    let below = format!("{}{}", id_down, contour(text_below));
    if !below.is_empty() {
        labels.push(EdgeLabel {
            side: LabelSide::Below,
            style,
            text: below,
        });
    }
    labels
}

/// `"a b"` with surrounding whitespace trimmed, so either part may be empty.
pub(crate) fn join_words(a: &str, b: &str) -> String {
    format!("{} {}", a, b).trim().to_string()
}
