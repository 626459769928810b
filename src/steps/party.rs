//! Party lifecycle steps: start, end, window open/close and placeholders.

use super::{edge_labels, ProtocolStep, StepContext, StepHeader};
use crate::geometry::{window_height, Height};
use crate::html::{GridBand, GridPlacement, MarkupBlock};
use crate::tikz::{Endpoint, Primitive, VectorDrawing};
use crate::types::{CoordinateResolver, Face, LifelineSegment, Party};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    Start,
    End,
}

impl LifecycleKind {
    pub fn type_name(self) -> &'static str {
        match self {
            LifecycleKind::Start => "start_party",
            LifecycleKind::End => "end_party",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LifecycleArgs {
    pub line: usize,
    pub kind: LifecycleKind,
    pub party: Arc<Party>,
    pub lifeline_segments: Vec<LifelineSegment>,
    pub extra_style: Option<String>,
}

impl LifecycleArgs {
    pub fn new(line: usize, kind: LifecycleKind, party: &Arc<Party>) -> Self {
        Self {
            line,
            kind,
            party: Arc::clone(party),
            lifeline_segments: Vec::new(),
            extra_style: None,
        }
    }

    pub fn segment(mut self, start: usize, end: usize, style: impl Into<String>) -> Self {
        self.lifeline_segments.push(LifelineSegment::new(start, end, style));
        self
    }
}

/// Start or end of a party's lifeline. Never numbered.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    header: StepHeader,
    kind: LifecycleKind,
    party: Arc<Party>,
    lifeline_segments: Vec<LifelineSegment>,
    node_name: String,
    height: Height,
}

impl Lifecycle {
    pub fn new(args: LifecycleArgs, ctx: &mut StepContext) -> Self {
        let header = ctx.header(args.line, true, args.extra_style);
        let height = Height::centered(ctx.geometry().lifecycle);
        Self::build(header, args.kind, args.party, args.lifeline_segments, height, ctx)
    }

    fn build(
        header: StepHeader,
        kind: LifecycleKind,
        party: Arc<Party>,
        lifeline_segments: Vec<LifelineSegment>,
        height: Height,
        ctx: &mut StepContext,
    ) -> Self {
        let node_name = ctx.fresh_node_name();
        tracing::debug!(
            step_type = kind.type_name(),
            line = header.line,
            party = party.name.as_str(),
            segments = lifeline_segments.len(),
            "built lifecycle"
        );
        Self {
            header,
            kind,
            party,
            lifeline_segments,
            node_name,
            height,
        }
    }

    pub fn kind(&self) -> LifecycleKind {
        self.kind
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn lifeline_segments(&self) -> &[LifelineSegment] {
        &self.lifeline_segments
    }

    fn box_node(&self, resolver: &dyn CoordinateResolver) -> Primitive {
        let mut options = vec![
            format!("name={}", self.node_name),
            format!("annex_{}_box", self.kind.type_name()),
        ];
        if !self.party.style.is_empty() {
            options.push(self.party.style.clone());
        }
        Primitive::Node {
            options,
            at: resolver.resolve(self.party.column, self.header.line),
            text: self.party.name.clone(),
        }
    }

    /// Anchor for a half-row position, synthesizing a midpoint node when the
    /// position falls between two rows. Each midpoint is emitted once.
    fn lifeline_endpoint(
        &self,
        half_row: usize,
        resolver: &dyn CoordinateResolver,
        emitted: &mut HashSet<String>,
        out: &mut Vec<Primitive>,
    ) -> Endpoint {
        let column = self.party.column;
        let row = half_row / 2;
        if half_row % 2 == 1 {
            let above = resolver.resolve(column, row);
            let name = format!("{}-half", above);
            if emitted.insert(name.clone()) {
                out.push(Primitive::HalfNode {
                    name: name.clone(),
                    above,
                    below: resolver.resolve(column, row + 1),
                });
            }
            Endpoint::Named(name)
        } else {
            Endpoint::Anchor(resolver.resolve(column, row))
        }
    }

    fn lifelines(&self, resolver: &dyn CoordinateResolver) -> Vec<Primitive> {
        let mut out = Vec::new();
        let mut emitted = HashSet::new();
        for segment in &self.lifeline_segments {
            let from = self.lifeline_endpoint(segment.start, resolver, &mut emitted, &mut out);
            let to = self.lifeline_endpoint(segment.end, resolver, &mut emitted, &mut out);
            out.push(Primitive::Line {
                style: segment.style.clone(),
                from,
                to,
            });
        }
        out
    }

    fn markup(&self, html_id: String) -> MarkupBlock {
        let column = self.party.annexid;
        MarkupBlock {
            step_type: self.kind.type_name().to_string(),
            html_rtl: false,
            html_id,
            html_text: self.party.name.clone(),
            height: self.height,
            placement: GridPlacement::cell(column, self.header.line),
            bands: self
                .lifeline_segments
                .iter()
                .map(|s| GridBand::from_half_rows(&s.style, column, s.start, s.end))
                .collect(),
        }
    }
}

impl ProtocolStep for Lifecycle {
    fn step_type(&self) -> &str {
        self.kind.type_name()
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
            nodes: vec![self.box_node(resolver)],
            connectors: self.lifelines(resolver),
        }
    }

    fn layout_markup(&self) -> Option<MarkupBlock> {
        Some(self.markup(String::new()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// Opening a window starts the opened party
    Open,
    /// Closing a window ends the closed party
    Close,
}

impl WindowKind {
    fn lifecycle(self) -> LifecycleKind {
        match self {
            WindowKind::Open => LifecycleKind::Start,
            WindowKind::Close => LifecycleKind::End,
        }
    }

    fn arrow_style(self) -> &'static str {
        match self {
            WindowKind::Open => "annex_open_window_start_party_arrow",
            WindowKind::Close => "annex_close_window_end_party_arrow",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WindowKind::Open => "open",
            WindowKind::Close => "close",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WindowArgs {
    pub line: usize,
    pub kind: WindowKind,
    /// The party opening or closing the window
    pub src: Arc<Party>,
    /// The window's party
    pub dest: Arc<Party>,
    pub lifeline_segments: Vec<LifelineSegment>,
    pub extra_style: Option<String>,
}

impl WindowArgs {
    pub fn new(line: usize, kind: WindowKind, src: &Arc<Party>, dest: &Arc<Party>) -> Self {
        Self {
            line,
            kind,
            src: Arc::clone(src),
            dest: Arc::clone(dest),
            lifeline_segments: Vec::new(),
            extra_style: None,
        }
    }

    pub fn segment(mut self, start: usize, end: usize, style: impl Into<String>) -> Self {
        self.lifeline_segments.push(LifelineSegment::new(start, end, style));
        self
    }
}

/// A lifecycle step triggered by another party opening or closing a window.
#[derive(Debug, Clone)]
pub struct WindowLifecycle {
    base: Lifecycle,
    kind: WindowKind,
    src: Arc<Party>,
}

impl WindowLifecycle {
    pub fn new(args: WindowArgs, ctx: &mut StepContext) -> Self {
        let header = ctx.header(args.line, false, args.extra_style);
        let height = window_height(ctx.geometry());
        let base = Lifecycle::build(header, args.kind.lifecycle(), args.dest, args.lifeline_segments, height, ctx);
        Self {
            base,
            kind: args.kind,
            src: args.src,
        }
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn src(&self) -> &Party {
        &self.src
    }

    pub fn dest(&self) -> &Party {
        &self.base.party
    }

    /// Face of the lifecycle node the arrow ends at, the one facing `src`.
    pub fn direction(&self) -> Face {
        if self.src.column > self.base.party.column {
            Face::East
        } else {
            Face::West
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.base
    }
}

impl ProtocolStep for WindowLifecycle {
    fn step_type(&self) -> &str {
        self.base.step_type()
    }

    fn header(&self) -> &StepHeader {
        &self.base.header
    }

    fn affected_parties(&self) -> Vec<&Party> {
        vec![&*self.src, &*self.base.party]
    }

    fn height(&self) -> Height {
        self.base.height
    }

    fn node_name(&self) -> Option<&str> {
        self.base.node_name()
    }

    fn draw_vector(&self, resolver: &dyn CoordinateResolver) -> VectorDrawing {
        let header = &self.base.header;
        let arrow = Primitive::Segment {
            style: self.kind.arrow_style().to_string(),
            offset: None,
            extra_style: header.extra_style.clone(),
            from: Endpoint::Anchor(resolver.resolve(self.src.column, header.line)),
            to: Endpoint::Face(self.base.node_name.clone(), self.direction()),
            labels: edge_labels(header, self.step_type(), self.kind.label(), "", true),
        };
        let mut connectors = vec![
            Primitive::Comment(format!("draw {} window arrow", self.kind.label())),
            arrow,
        ];
        connectors.extend(self.base.lifelines(resolver));
        VectorDrawing {
            nodes: vec![self.base.box_node(resolver)],
            connectors,
        }
    }

    fn layout_markup(&self) -> Option<MarkupBlock> {
        Some(self.base.markup(self.base.header.html_id()))
    }
}

/// Reserves a node name (and optionally a column) without drawing anything.
#[derive(Debug, Clone)]
pub struct DummyParty {
    header: StepHeader,
    party: Option<Arc<Party>>,
    node_name: String,
}

impl DummyParty {
    pub fn new(line: usize, party: Option<&Arc<Party>>, ctx: &mut StepContext) -> Self {
        let header = ctx.header(line, true, None);
        let node_name = ctx.fresh_node_name();
        Self {
            header,
            party: party.map(Arc::clone),
            node_name,
        }
    }
}

impl ProtocolStep for DummyParty {
    fn step_type(&self) -> &str {
        "dummy_party"
    }

    fn header(&self) -> &StepHeader {
        &self.header
    }

    fn affected_parties(&self) -> Vec<&Party> {
        self.party.iter().map(|p| &**p).collect()
    }

    fn height(&self) -> Height {
        Height::centered(0.0)
    }

    fn node_name(&self) -> Option<&str> {
        Some(self.node_name.as_str())
    }

    fn draw_vector(&self, _resolver: &dyn CoordinateResolver) -> VectorDrawing {
        VectorDrawing::default()
    }

    fn layout_markup(&self) -> Option<MarkupBlock> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridResolver;

    #[test]
    fn test_odd_endpoints_synthesize_midpoints() {
        let idp = Arc::new(Party::new("IdP", 2, 4));
        let mut ctx = StepContext::new();
        let start = Lifecycle::new(
            LifecycleArgs::new(0, LifecycleKind::Start, &idp)
                .segment(1, 6, "annex_lifeline")
                .segment(7, 9, "annex_lifeline_dashed"),
            &mut ctx,
        );
        let drawing = start.draw_vector(&GridResolver::default());
        let halves: Vec<&Primitive> = drawing
            .connectors
            .iter()
            .filter(|p| matches!(p, Primitive::HalfNode { .. }))
            .collect();
        assert_eq!(halves.len(), 3);
        assert_eq!(
            halves[0],
            &Primitive::HalfNode {
                name: "pos-2-0-half".to_string(),
                above: crate::types::Anchor("pos-2-0".to_string()),
                below: crate::types::Anchor("pos-2-1".to_string()),
            }
        );
        assert_eq!(
            drawing.connectors[1].to_string(),
            r"\draw[annex_lifeline] (pos-2-0-half) -- (pos-2-3);"
        );
        assert!(start.header().skip_number());
    }

    #[test]
    fn test_shared_midpoint_emitted_once() {
        let p = Arc::new(Party::new("P", 1, 2));
        let mut ctx = StepContext::new();
        let start = Lifecycle::new(
            LifecycleArgs::new(0, LifecycleKind::Start, &p)
                .segment(3, 3, "a")
                .segment(3, 5, "b"),
            &mut ctx,
        );
        let tikz = start.draw_vector(&GridResolver::default()).to_tikz();
        assert_eq!(tikz.matches("(pos-1-1-half) at").count(), 1);
        assert_eq!(tikz.matches("(pos-1-2-half) at").count(), 1);
        assert!(tikz.contains(r"\draw[a] (pos-1-1-half) -- (pos-1-1-half);"));
        assert!(tikz.contains(r"\draw[b] (pos-1-1-half) -- (pos-1-2-half);"));
    }

    #[test]
    fn test_plain_lifecycle_height() {
        let p = Arc::new(Party::new("P", 1, 2));
        let mut ctx = StepContext::new();
        for kind in [LifecycleKind::Start, LifecycleKind::End] {
            let step = Lifecycle::new(LifecycleArgs::new(1, kind, &p), &mut ctx);
            assert_eq!(step.height().to_string(), "5ex, center");
            assert_eq!(step.layout_markup().unwrap().height.to_string(), "5ex, center");
        }
    }

    #[test]
    fn test_lifeline_bands() {
        let idp = Arc::new(Party::new("IdP", 2, 4));
        let mut ctx = StepContext::new();
        let end = Lifecycle::new(LifecycleArgs::new(9, LifecycleKind::End, &idp).segment(2, 9, "alive"), &mut ctx);
        let block = end.layout_markup().unwrap();
        assert_eq!(block.bands, vec![GridBand {
            class: "alive".to_string(),
            column_start: 4,
            row_start: 3,
            row_end: 5,
        }]);
        assert_eq!(block.placement.row_start, 10);
    }

    #[test]
    fn test_window_arrow() {
        let rp = Arc::new(Party::new("RP", 3, 6));
        let popup = Arc::new(Party::new("Popup", 1, 2));
        let mut ctx = StepContext::new();
        let open = WindowLifecycle::new(WindowArgs::new(4, WindowKind::Open, &rp, &popup), &mut ctx);
        assert_eq!(open.direction(), Face::East);
        assert_eq!(open.height().to_string(), "6ex, center,yshift=1ex");
        assert_eq!(open.step_type(), "start_party");
        let drawing = open.draw_vector(&GridResolver::default());
        assert_eq!(
            drawing.connectors[1].to_string(),
            r"\draw[annex_open_window_start_party_arrow] (pos-3-4) to node[above,annex_start_party_text] {\annexstepid{1}\contour{white}{open}} (annex_node_1.east);"
        );
    }

    #[test]
    fn test_dummy_is_silent() {
        let mut ctx = StepContext::new();
        let dummy = DummyParty::new(3, None, &mut ctx);
        assert!(dummy.draw_vector(&GridResolver::default()).is_empty());
        assert!(dummy.layout_markup().is_none());
        assert_eq!(dummy.node_name(), Some("annex_node_1"));
        assert!(dummy.affected_parties().is_empty());
    }
}
