//! SVG filter graphs: typed primitives, reference validation and markup.
//!
//! A browser renders the resulting `<filter>`; this module only describes the
//! graph and checks that every `in`/`in2` reference resolves to an earlier
//! primitive's `result`.

use std::collections::HashMap;
use std::fmt::{self, Write as _};

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::NoiseError;
use crate::color::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurbulenceKind {
    FractalNoise,
    Turbulence,
}

impl TurbulenceKind {
    pub const ALL: [TurbulenceKind; 2] = [TurbulenceKind::FractalNoise, TurbulenceKind::Turbulence];

    pub fn as_str(&self) -> &'static str {
        match self {
            TurbulenceKind::FractalNoise => "fractalNoise",
            TurbulenceKind::Turbulence => "turbulence",
        }
    }
}

/// `baseFrequency`: one value for both axes or an `x y` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BaseFrequency {
    Uniform(f64),
    Pair(f64, f64),
}

impl BaseFrequency {
    pub fn x(&self) -> f64 {
        match *self {
            BaseFrequency::Uniform(f) | BaseFrequency::Pair(f, _) => f,
        }
    }

    pub fn y(&self) -> f64 {
        match *self {
            BaseFrequency::Uniform(f) | BaseFrequency::Pair(_, f) => f,
        }
    }
}

impl fmt::Display for BaseFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseFrequency::Uniform(v) => write!(f, "{v}"),
            BaseFrequency::Pair(x, y) => write!(f, "{x} {y}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StitchTiles {
    Stitch,
    NoStitch,
}

impl StitchTiles {
    pub fn as_str(&self) -> &'static str {
        match self {
            StitchTiles::Stitch => "stitch",
            StitchTiles::NoStitch => "noStitch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    R,
    G,
    B,
    A,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::R => "R",
            Channel::G => "G",
            Channel::B => "B",
            Channel::A => "A",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    SoftLight,
}

impl BlendMode {
    pub const ALL: [BlendMode; 8] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::SoftLight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::SoftLight => "soft-light",
        }
    }

    /// Separable blend of one channel, both operands in `[0, 1]`.
    pub fn apply(&self, backdrop: f64, source: f64) -> f64 {
        let (b, s) = (backdrop, source);
        match self {
            BlendMode::Normal => s,
            BlendMode::Multiply => b * s,
            BlendMode::Screen => b + s - b * s,
            BlendMode::Overlay => hard_light(s, b),
            BlendMode::Darken => b.min(s),
            BlendMode::Lighten => b.max(s),
            BlendMode::ColorDodge => {
                if b == 0.0 {
                    0.0
                } else if s >= 1.0 {
                    1.0
                } else {
                    (b / (1.0 - s)).min(1.0)
                }
            }
            BlendMode::SoftLight => {
                if s <= 0.5 {
                    b - (1.0 - 2.0 * s) * b * (1.0 - b)
                } else {
                    let d = if b <= 0.25 { ((16.0 * b - 12.0) * b + 4.0) * b } else { b.sqrt() };
                    b + (2.0 * s - 1.0) * (d - b)
                }
            }
        }
    }
}

fn hard_light(b: f64, s: f64) -> f64 {
    if s <= 0.5 {
        b * 2.0 * s
    } else {
        let s2 = 2.0 * s - 1.0;
        b + s2 - b * s2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistantLight {
    pub azimuth: f64,
    pub elevation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Turbulence {
        kind: TurbulenceKind,
        base_frequency: BaseFrequency,
        num_octaves: u32,
        seed: Option<f64>,
        stitch_tiles: Option<StitchTiles>,
    },
    ColorMatrix {
        values: Vec<f64>,
    },
    GaussianBlur {
        std_deviation: f64,
    },
    DisplacementMap {
        scale: f64,
        x_channel: Channel,
        y_channel: Channel,
    },
    DiffuseLighting {
        surface_scale: f64,
        diffuse_constant: Option<f64>,
        lighting_color: Rgb,
        light: DistantLight,
    },
    Composite {
        k1: f64,
        k2: f64,
        k3: f64,
        k4: f64,
    },
    Blend {
        mode: BlendMode,
    },
    ComponentTransfer {
        alpha_slope: f64,
    },
}

impl Primitive {
    pub fn tag(&self) -> &'static str {
        match self {
            Primitive::Turbulence { .. } => "feTurbulence",
            Primitive::ColorMatrix { .. } => "feColorMatrix",
            Primitive::GaussianBlur { .. } => "feGaussianBlur",
            Primitive::DisplacementMap { .. } => "feDisplacementMap",
            Primitive::DiffuseLighting { .. } => "feDiffuseLighting",
            Primitive::Composite { .. } => "feComposite",
            Primitive::Blend { .. } => "feBlend",
            Primitive::ComponentTransfer { .. } => "feComponentTransfer",
        }
    }

    /// Number of image inputs the primitive reads (`in`, `in2`).
    pub fn arity(&self) -> usize {
        match self {
            Primitive::Turbulence { .. } => 0,
            Primitive::DisplacementMap { .. } | Primitive::Composite { .. } | Primitive::Blend { .. } => 2,
            _ => 1,
        }
    }

    fn attrs(&self) -> Vec<(&'static str, String)> {
        match self {
            Primitive::Turbulence { kind, base_frequency, num_octaves, seed, stitch_tiles } => {
                let mut attrs = vec![
                    ("type", kind.as_str().to_string()),
                    ("baseFrequency", base_frequency.to_string()),
                    ("numOctaves", num_octaves.to_string()),
                ];
                if let Some(seed) = seed {
                    attrs.push(("seed", seed.to_string()));
                }
                if let Some(stitch) = stitch_tiles {
                    attrs.push(("stitchTiles", stitch.as_str().to_string()));
                }
                attrs
            }
            Primitive::ColorMatrix { values } => {
                let joined = values.iter().map(f64::to_string).collect::<Vec<_>>().join(" ");
                vec![("type", "matrix".to_string()), ("values", joined)]
            }
            Primitive::GaussianBlur { std_deviation } => vec![("stdDeviation", std_deviation.to_string())],
            Primitive::DisplacementMap { scale, x_channel, y_channel } => vec![
                ("scale", scale.to_string()),
                ("xChannelSelector", x_channel.as_str().to_string()),
                ("yChannelSelector", y_channel.as_str().to_string()),
            ],
            Primitive::DiffuseLighting { surface_scale, diffuse_constant, lighting_color, .. } => {
                let mut attrs = vec![("surfaceScale", surface_scale.to_string())];
                if let Some(kd) = diffuse_constant {
                    attrs.push(("diffuseConstant", kd.to_string()));
                }
                attrs.push(("lighting-color", lighting_color.to_hex()));
                attrs
            }
            Primitive::Composite { k1, k2, k3, k4 } => vec![
                ("operator", "arithmetic".to_string()),
                ("k1", k1.to_string()),
                ("k2", k2.to_string()),
                ("k3", k3.to_string()),
                ("k4", k4.to_string()),
            ],
            Primitive::Blend { mode } => vec![("mode", mode.as_str().to_string())],
            Primitive::ComponentTransfer { .. } => Vec::new(),
        }
    }

    fn child(&self) -> Option<String> {
        match self {
            Primitive::DiffuseLighting { light, .. } => Some(format!(
                "<feDistantLight azimuth=\"{}\" elevation=\"{}\" />",
                light.azimuth, light.elevation
            )),
            Primitive::ComponentTransfer { alpha_slope } => {
                Some(format!("<feFuncA type=\"linear\" slope=\"{alpha_slope}\" />"))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterInput {
    SourceGraphic,
    SourceAlpha,
    Result(String),
}

impl FilterInput {
    pub fn result(name: impl Into<String>) -> Self {
        FilterInput::Result(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterInput::SourceGraphic => "SourceGraphic",
            FilterInput::SourceAlpha => "SourceAlpha",
            FilterInput::Result(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterNode {
    pub primitive: Primitive,
    pub input: Option<FilterInput>,
    pub input2: Option<FilterInput>,
    pub result: Option<String>,
}

impl FilterNode {
    pub fn new(primitive: Primitive) -> Self {
        Self { primitive, input: None, input2: None, result: None }
    }

    pub fn input(mut self, input: FilterInput) -> Self {
        self.input = Some(input);
        self
    }

    pub fn input2(mut self, input: FilterInput) -> Self {
        self.input2 = Some(input);
        self
    }

    pub fn result(mut self, name: impl Into<String>) -> Self {
        self.result = Some(name.into());
        self
    }

    fn write_markup(&self, out: &mut String, indent: usize) {
        let pad = " ".repeat(indent);
        let mut attrs = Vec::new();
        if let Some(input) = &self.input {
            attrs.push(("in", input.as_str().to_string()));
        }
        if let Some(input2) = &self.input2 {
            attrs.push(("in2", input2.as_str().to_string()));
        }
        attrs.extend(self.primitive.attrs());
        if let Some(result) = &self.result {
            attrs.push(("result", result.clone()));
        }
        let tag = self.primitive.tag();
        let rendered = render_attrs(&attrs);
        match self.primitive.child() {
            Some(child) => {
                let _ = writeln!(out, "{pad}<{tag}{rendered}>");
                let _ = writeln!(out, "{pad}  {child}");
                let _ = writeln!(out, "{pad}</{tag}>");
            }
            None => {
                let _ = writeln!(out, "{pad}<{tag}{rendered} />");
            }
        }
    }
}

fn render_attrs(attrs: &[(&str, String)]) -> String {
    attrs.iter().map(|(k, v)| format!(" {k}=\"{v}\"")).collect()
}

/// The `x`/`y`/`width`/`height` attributes of a `<filter>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRegion {
    pub x: String,
    pub y: String,
    pub width: String,
    pub height: String,
}

impl FilterRegion {
    pub fn new(x: impl ToString, y: impl ToString, width: impl ToString, height: impl ToString) -> Self {
        Self { x: x.to_string(), y: y.to_string(), width: width.to_string(), height: height.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGraph {
    pub id: String,
    pub region: Option<FilterRegion>,
    pub nodes: Vec<FilterNode>,
}

/// Dependency graph of a validated filter; edges point from producer to consumer.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    pub graph: StableDiGraph<usize, ()>,
    pub output: NodeIndex,
}

impl FilterGraph {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), region: None, nodes: Vec::new() }
    }

    pub fn with_region(mut self, region: FilterRegion) -> Self {
        self.region = Some(region);
        self
    }

    pub fn push(mut self, node: FilterNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// First primitive of the given kind, mostly useful for previews.
    pub fn find(&self, pred: impl Fn(&Primitive) -> bool) -> Option<&Primitive> {
        self.nodes.iter().map(|n| &n.primitive).find(|p| pred(p))
    }

    pub fn compile(&self) -> Result<CompiledFilter, NoiseError> {
        if self.id.trim().is_empty() {
            return Err(NoiseError::FilterGraph("filter id is empty".into()));
        }
        if self.nodes.is_empty() {
            return Err(NoiseError::FilterGraph(format!("filter '{}' has no primitives", self.id)));
        }

        let mut graph = StableDiGraph::new();
        let indices: Vec<NodeIndex> = (0..self.nodes.len()).map(|i| graph.add_node(i)).collect();
        // latest producer of each result name seen so far
        let mut producers: HashMap<&str, usize> = HashMap::new();

        for (i, node) in self.nodes.iter().enumerate() {
            let inputs = [&node.input, &node.input2];
            for slot in inputs.iter().take(node.primitive.arity()) {
                let producer = match slot {
                    Some(FilterInput::Result(name)) => match producers.get(name.as_str()) {
                        Some(&p) => Some(p),
                        None => {
                            return Err(NoiseError::FilterGraph(format!(
                                "{} #{i} in filter '{}' references unknown result '{name}'",
                                node.primitive.tag(),
                                self.id
                            )))
                        }
                    },
                    Some(FilterInput::SourceGraphic | FilterInput::SourceAlpha) => None,
                    None => i.checked_sub(1),
                };
                if let Some(p) = producer {
                    graph.update_edge(indices[p], indices[i], ());
                }
            }
            if let Some(result) = &node.result {
                producers.insert(result.as_str(), i);
            }
        }

        let output = indices[indices.len() - 1];
        Ok(CompiledFilter { graph, output })
    }

    /// Compiles the graph and logs primitives whose output is never used.
    pub fn validate(&self) -> Result<(), NoiseError> {
        let compiled = self.compile()?;
        for i in compiled.unused() {
            warn!(filter = %self.id, index = i, tag = self.nodes[i].primitive.tag(), "filter primitive does not reach the output");
        }
        Ok(())
    }

    pub fn to_markup(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut out = String::new();
        let region = match &self.region {
            Some(r) => render_attrs(&[
                ("x", r.x.clone()),
                ("y", r.y.clone()),
                ("width", r.width.clone()),
                ("height", r.height.clone()),
            ]),
            None => String::new(),
        };
        let _ = writeln!(out, "{pad}<filter id=\"{}\"{region}>", self.id);
        for node in &self.nodes {
            node.write_markup(&mut out, indent + 2);
        }
        let _ = writeln!(out, "{pad}</filter>");
        out
    }
}

impl CompiledFilter {
    /// Indices of primitives with no path to the final primitive.
    pub fn unused(&self) -> Vec<usize> {
        let mut unused: Vec<usize> = self
            .graph
            .node_indices()
            .filter(|&n| !petgraph::algo::has_path_connecting(&self.graph, n, self.output, None))
            .map(|n| self.graph[n])
            .collect();
        unused.sort_unstable();
        unused
    }
}

/// An element drawn inside the `<svg>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Rect {
        x: Option<String>,
        y: Option<String>,
        width: String,
        height: String,
        fill: Option<Rgb>,
    },
    Image {
        href: String,
    },
}

impl Element {
    pub fn full_rect(fill: Option<Rgb>) -> Self {
        Element::Rect { x: None, y: None, width: "100%".into(), height: "100%".into(), fill }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub element: Element,
    pub filtered: bool,
    pub blend_mode: Option<BlendMode>,
}

impl Layer {
    pub fn plain(element: Element) -> Self {
        Self { element, filtered: false, blend_mode: None }
    }

    pub fn filtered(element: Element) -> Self {
        Self { element, filtered: true, blend_mode: None }
    }

    pub fn blended(mut self, mode: BlendMode) -> Self {
        self.blend_mode = Some(mode);
        self
    }
}

/// The copyable `<svg>` snippet shown on each filter page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgDocument {
    pub width: u32,
    pub height: u32,
    pub view_box: Option<[f64; 4]>,
    pub filter: FilterGraph,
    pub layers: Vec<Layer>,
}

impl SvgDocument {
    pub fn new(filter: FilterGraph) -> Self {
        Self { width: 400, height: 400, view_box: None, filter, layers: Vec::new() }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn view_box(mut self, view_box: [f64; 4]) -> Self {
        self.view_box = Some(view_box);
        self
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let view_box = match self.view_box {
            Some([x, y, w, h]) => format!(" viewBox=\"{x} {y} {w} {h}\""),
            None => String::new(),
        };
        let _ = writeln!(
            out,
            "<svg width=\"{}\" height=\"{}\"{view_box} xmlns=\"http://www.w3.org/2000/svg\">",
            self.width, self.height
        );
        out.push_str("  <defs>\n");
        out.push_str(&self.filter.to_markup(4));
        out.push_str("  </defs>\n");
        for layer in &self.layers {
            let mut attrs = Vec::new();
            let tag = match &layer.element {
                Element::Rect { x, y, width, height, fill } => {
                    if let Some(x) = x {
                        attrs.push(("x", x.clone()));
                    }
                    if let Some(y) = y {
                        attrs.push(("y", y.clone()));
                    }
                    attrs.push(("width", width.clone()));
                    attrs.push(("height", height.clone()));
                    if let Some(fill) = fill {
                        attrs.push(("fill", fill.to_hex()));
                    }
                    "rect"
                }
                Element::Image { href } => {
                    attrs.push(("href", href.clone()));
                    attrs.push(("x", "0".into()));
                    attrs.push(("y", "0".into()));
                    attrs.push(("width", "100%".into()));
                    attrs.push(("height", "100%".into()));
                    "image"
                }
            };
            if layer.filtered {
                attrs.push(("filter", format!("url(#{})", self.filter.id)));
            }
            if let Some(mode) = layer.blend_mode {
                attrs.push(("style", format!("mix-blend-mode: {}", mode.as_str())));
            }
            let _ = writeln!(out, "  <{tag}{} />", render_attrs(&attrs));
        }
        out.push_str("</svg>\n");
        out
    }
}
