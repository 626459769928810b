//! Directed requests between two parties.

use super::{edge_labels, join_words, ProtocolStep, StepContext, StepHeader};
use crate::error::{Result, StepError};
use crate::geometry::{line_count, request_height, Height};
use crate::html::{GridPlacement, MarkupBlock};
use crate::tikz::{Endpoint, LabelSide, Primitive, VectorDrawing};
use crate::types::{CoordinateResolver, Party};
use std::sync::Arc;

/// Method, URL and parameters of an HTTP-like request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpMessage {
    pub method: String,
    pub url: String,
    pub parameters: String,
}

impl HttpMessage {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            parameters: String::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = parameters.into();
        self
    }

    fn html_text(&self) -> String {
        format!(
            r#"<span class="http_method">{}</span> <span class="http_url">{}</span> <span class="http_parameters">{}</span> "#,
            self.method, self.url, self.parameters
        )
    }
}

/// Status code, headers and body parameters of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpReply {
    pub code: String,
    pub headers: String,
    pub parameters: String,
}

impl HttpReply {
    fn html_text(&self) -> String {
        format!(
            r#"<span class="http_code">{}</span> <span class="http_headers">{}</span> "#,
            self.code, self.headers
        )
    }
}

/// Two arrows on one row: a request one way and its response the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    HttpRequestResponse,
    XhrRequestResponse,
    HttpResponseRequest,
    XhrResponseRequest,
}

impl Exchange {
    pub fn type_name(self) -> &'static str {
        match self {
            Exchange::HttpRequestResponse => "request_response",
            Exchange::XhrRequestResponse => "xhr_request_response",
            Exchange::HttpResponseRequest => "response_request",
            Exchange::XhrResponseRequest => "xhr_response_request",
        }
    }

    /// Role drawn above the midline
    pub fn type_above(self) -> &'static str {
        match self {
            Exchange::HttpRequestResponse => "http_request",
            Exchange::XhrRequestResponse => "xhr_request",
            Exchange::HttpResponseRequest => "http_response",
            Exchange::XhrResponseRequest => "xhr_response",
        }
    }

    /// Role drawn below the midline
    pub fn type_below(self) -> &'static str {
        match self {
            Exchange::HttpRequestResponse => "http_response",
            Exchange::XhrRequestResponse => "xhr_response",
            Exchange::HttpResponseRequest => "http_request",
            Exchange::XhrResponseRequest => "xhr_request",
        }
    }

    /// Whether the upper arrow runs from `src` to `dest`
    fn forward_above(self) -> bool {
        matches!(self, Exchange::HttpRequestResponse | Exchange::XhrRequestResponse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Free text above and below the arrow
    Plain { text: String, below: String },
    Http(HttpMessage),
    Xhr(HttpMessage),
    HttpResponse(HttpReply),
    XhrResponse(HttpReply),
    Websocket { parameters: String },
    PostMessage { body: String, comment: String },
    Exchange(Exchange, HttpMessage),
}

impl RequestKind {
    pub fn plain(text: impl Into<String>) -> Self {
        RequestKind::Plain {
            text: text.into(),
            below: String::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            RequestKind::Plain { .. } => "request",
            RequestKind::Http(_) => "http_request",
            RequestKind::Xhr(_) => "xhr_request",
            RequestKind::HttpResponse(_) => "http_response",
            RequestKind::XhrResponse(_) => "xhr_response",
            RequestKind::Websocket { .. } => "websocket",
            RequestKind::PostMessage { .. } => "postmessage",
            RequestKind::Exchange(ex, _) => ex.type_name(),
        }
    }

    fn id_above(&self) -> bool {
        !matches!(self, RequestKind::Plain { .. } | RequestKind::Websocket { .. })
    }

    /// Text above and below the midline.
    fn labels(&self, skip_number: bool) -> (String, String) {
        match self {
            RequestKind::Plain { text, below } => (text.clone(), below.clone()),
            RequestKind::Http(msg) | RequestKind::Xhr(msg) | RequestKind::Exchange(_, msg) => {
                (join_words(&msg.method, &msg.url), msg.parameters.clone())
            }
            RequestKind::HttpResponse(reply) | RequestKind::XhrResponse(reply) => {
                let mut above = join_words(&reply.code, &reply.headers);
                if above.is_empty() && !skip_number {
                    above = "Response".to_string();
                }
                (above, reply.parameters.clone())
            }
            RequestKind::Websocket { parameters } => ("WebSocket".to_string(), parameters.clone()),
            RequestKind::PostMessage { body, comment } => (body.clone(), comment.clone()),
        }
    }

    fn html_text(&self) -> String {
        match self {
            RequestKind::Plain { text, .. } => text.clone(),
            RequestKind::Http(msg) | RequestKind::Xhr(msg) | RequestKind::Exchange(_, msg) => msg.html_text(),
            RequestKind::HttpResponse(reply) | RequestKind::XhrResponse(reply) => reply.html_text(),
            RequestKind::Websocket { parameters } => {
                format!(r#"<span class="websocket_parameters">{}</span> "#, parameters)
            }
            RequestKind::PostMessage { body, comment } => format!(
                r#"<span class="postmessage_body">{}</span> <span class="postmessage_comment">{}</span>"#,
                body, comment
            ),
        }
    }
}

/// Constructor arguments for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestArgs {
    pub line: usize,
    pub kind: RequestKind,
    pub src: Option<Arc<Party>>,
    pub dest: Option<Arc<Party>>,
    /// Name of an earlier request this one answers
    pub reply_to: Option<String>,
    /// Registers this request so later steps can reply to it
    pub name: Option<String>,
    pub skip_number: bool,
    pub extra_style: Option<String>,
}

impl RequestArgs {
    pub fn new(line: usize, kind: RequestKind) -> Self {
        Self {
            line,
            kind,
            src: None,
            dest: None,
            reply_to: None,
            name: None,
            skip_number: false,
            extra_style: None,
        }
    }

    pub fn between(mut self, src: &Arc<Party>, dest: &Arc<Party>) -> Self {
        self.src = Some(Arc::clone(src));
        self.dest = Some(Arc::clone(dest));
        self
    }

    pub fn reply_to(mut self, name: impl Into<String>) -> Self {
        self.reply_to = Some(name.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn skip_number(mut self) -> Self {
        self.skip_number = true;
        self
    }

    pub fn extra_style(mut self, style: impl Into<String>) -> Self {
        self.extra_style = Some(style.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    header: StepHeader,
    kind: RequestKind,
    src: Arc<Party>,
    dest: Arc<Party>,
    text_above: String,
    text_below: String,
    id_above: bool,
    height: Height,
    compound_offset: f64,
}

impl Request {
    pub fn new(args: RequestArgs, ctx: &mut StepContext) -> Result<Self> {
        let RequestArgs {
            line,
            kind,
            src,
            dest,
            reply_to,
            name,
            skip_number,
            extra_style,
        } = args;
        let type_name = kind.type_name();

        // A reply travels back along the original request.
        let (src, dest) = match reply_to {
            Some(target) => {
                let (orig_src, orig_dest) = ctx
                    .request_endpoints(&target)
                    .ok_or_else(|| StepError::UnresolvedReply {
                        line,
                        target: target.clone(),
                    })?;
                tracing::debug!(line, target = target.as_str(), "resolved reply");
                (orig_dest, orig_src)
            }
            None => {
                let src = src.ok_or(StepError::MissingParty {
                    line,
                    kind: type_name,
                    role: "src",
                })?;
                let dest = dest.ok_or(StepError::MissingParty {
                    line,
                    kind: type_name,
                    role: "dest",
                })?;
                (src, dest)
            }
        };

        let header = ctx.header(line, skip_number, extra_style);
        let (text_above, text_below) = kind.labels(header.skip_number());
        let id_above = kind.id_above();
        let numbered = !header.skip_number();
        let has_above = !text_above.is_empty() || (id_above && numbered);
        let has_below = !text_below.is_empty() || (!id_above && numbered);
        let height = request_height(has_above, has_below, line_count(&text_below), ctx.geometry());

        if let Some(name) = name {
            ctx.register_request(name, Arc::clone(&src), Arc::clone(&dest));
        }

        tracing::debug!(
            step_type = type_name,
            line,
            number = ?header.number,
            src = src.name.as_str(),
            dest = dest.name.as_str(),
            "built request"
        );

        Ok(Self {
            header,
            kind,
            src,
            dest,
            text_above,
            text_below,
            id_above,
            height,
            compound_offset: ctx.geometry().compound_offset,
        })
    }

    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    pub fn src(&self) -> &Party {
        &self.src
    }

    pub fn dest(&self) -> &Party {
        &self.dest
    }

    pub fn text_above(&self) -> &str {
        &self.text_above
    }

    pub fn text_below(&self) -> &str {
        &self.text_below
    }

    pub fn id_above(&self) -> bool {
        self.id_above
    }

    /// True when the arrow points right-to-left.
    pub fn html_rtl(&self) -> bool {
        self.src.column > self.dest.column
    }

    pub fn html_text(&self) -> String {
        self.kind.html_text()
    }
}

impl ProtocolStep for Request {
    fn step_type(&self) -> &str {
        self.kind.type_name()
    }

    fn header(&self) -> &StepHeader {
        &self.header
    }

    fn affected_parties(&self) -> Vec<&Party> {
        vec![&*self.src, &*self.dest]
    }

    fn height(&self) -> Height {
        self.height
    }

    fn draw_vector(&self, resolver: &dyn CoordinateResolver) -> VectorDrawing {
        let line = self.header.line;
        let src = Endpoint::Anchor(resolver.resolve(self.src.column, line));
        let dest = Endpoint::Anchor(resolver.resolve(self.dest.column, line));
        let labels = edge_labels(
            &self.header,
            self.step_type(),
            &self.text_above,
            &self.text_below,
            self.id_above,
        );

        let mut connectors = vec![Primitive::Comment(format!("draw {}", self.step_type()))];
        match &self.kind {
            RequestKind::Exchange(exchange, _) => {
                let (above, below): (Vec<_>, Vec<_>) =
                    labels.into_iter().partition(|l| l.side == LabelSide::Above);
                let (upper, lower) = if exchange.forward_above() {
                    ((src.clone(), dest.clone()), (dest, src))
                } else {
                    ((dest.clone(), src.clone()), (src, dest))
                };
                connectors.push(Primitive::Segment {
                    style: format!("annex_{}", exchange.type_above()),
                    offset: Some(self.compound_offset),
                    extra_style: self.header.extra_style.clone(),
                    from: upper.0,
                    to: upper.1,
                    labels: above,
                });
                connectors.push(Primitive::Segment {
                    style: format!("annex_{}", exchange.type_below()),
                    offset: Some(-self.compound_offset),
                    extra_style: self.header.extra_style.clone(),
                    from: lower.0,
                    to: lower.1,
                    labels: below,
                });
            }
            _ => connectors.push(Primitive::Segment {
                style: format!("annex_{}", self.step_type()),
                offset: None,
                extra_style: self.header.extra_style.clone(),
                from: src,
                to: dest,
                labels,
            }),
        }

        VectorDrawing {
            nodes: Vec::new(),
            connectors,
        }
    }

    fn layout_markup(&self) -> Option<MarkupBlock> {
        Some(MarkupBlock {
            step_type: self.step_type().to_string(),
            html_rtl: self.html_rtl(),
            html_id: self.header.html_id(),
            html_text: self.html_text(),
            height: self.height,
            placement: GridPlacement::between(self.src.annexid, self.dest.annexid, self.header.line),
            bands: Vec::new(),
        })
    }
}
