// draw.io (mxGraph) XML generation for class diagrams
//
// Each class becomes one rectangular vertex whose label is an HTML fragment.
// The label travels inside an XML attribute, so all of its markup is
// entity-escaped.

use crate::analysis::{ClassRecord, MemberEntry};

const CELL_STYLE: &str = "verticalAlign=top;align=left;overflow=fill;fontSize=12;\
fontFamily=Helvetica;html=1;rounded=0;shadow=0;comic=0;labelBackgroundColor=none;strokeWidth=1";

const GRAPH_MODEL_ATTRS: &str = "dx=\"1433\" dy=\"922\" grid=\"1\" gridSize=\"10\" guides=\"1\" \
tooltips=\"1\" connect=\"1\" arrows=\"1\" fold=\"1\" page=\"1\" pageScale=\"1\" pageWidth=\"850\" \
pageHeight=\"1100\" background=\"none\" math=\"0\" shadow=\"0\"";

/// Single-column node placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub x: i64,
    /// y of the first node
    pub y: i64,
    /// Vertical distance between consecutive nodes
    pub step: i64,
    pub width: u32,
    pub height: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            step: 250,
            width: 300,
            height: 240,
        }
    }
}

/// A positioned class box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    /// Cell id, the class name
    pub id: String,
    /// Unescaped HTML label
    pub label: String,
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl DiagramNode {
    fn to_xml(&self) -> String {
        format!(
            "<mxCell id=\"{}\" value=\"{}\" style=\"{}\" vertex=\"1\" parent=\"1\">\
<mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\" /></mxCell>",
            escape_attr(&self.id),
            escape_attr(&self.label),
            CELL_STYLE,
            self.x,
            self.y,
            self.width,
            self.height
        )
    }
}

/// Writes class records as a draw.io document
pub struct DrawioWriter {
    layout: Layout,
    diagram_name: String,
}

impl DrawioWriter {
    pub fn new() -> Self {
        Self {
            layout: Layout::default(),
            diagram_name: "UML Class Diagram".to_string(),
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.diagram_name = name.to_string();
        self
    }

    /// Place one node per record, top to bottom in record order
    pub fn nodes(&self, classes: &[ClassRecord]) -> Vec<DiagramNode> {
        let mut y = self.layout.y;
        classes
            .iter()
            .map(|class| {
                let node = DiagramNode {
                    id: class.name.clone(),
                    label: class_label(class),
                    x: self.layout.x,
                    y,
                    width: self.layout.width,
                    height: self.layout.height,
                };
                y += self.layout.step;
                node
            })
            .collect()
    }

    /// Render the complete XML document
    pub fn render(&self, classes: &[ClassRecord]) -> String {
        let mut lines = Vec::new();
        lines.push("<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string());
        lines.push(
            "<mxfile host=\"app.diagrams.net\" agent=\"Mozilla/5.0\" version=\"24.7.6\">".to_string(),
        );
        lines.push(format!("  <diagram name=\"{}\">", escape_attr(&self.diagram_name)));
        lines.push(format!("    <mxGraphModel {}>", GRAPH_MODEL_ATTRS));
        lines.push("      <root>".to_string());
        lines.push("        <mxCell id=\"0\" />".to_string());
        lines.push("        <mxCell id=\"1\" parent=\"0\" />".to_string());

        for node in self.nodes(classes) {
            lines.push(format!("        {}", node.to_xml()));
        }

        lines.push("      </root>".to_string());
        lines.push("    </mxGraphModel>".to_string());
        lines.push("  </diagram>".to_string());
        lines.push("</mxfile>".to_string());

        let mut xml = lines.join("\n");
        xml.push('\n');
        xml
    }
}

impl Default for DrawioWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Name of the file a sub-package's diagram is written to
pub fn output_file_name(sub_package: &str) -> String {
    format!("{}_class_diagram.xml", sub_package)
}

/// HTML label: bold name, rule, attributes, rule, methods
fn class_label(class: &ClassRecord) -> String {
    format!(
        "<p style=\"margin:0px;margin-top:4px;text-align:center;\"><b>{}</b></p><hr size=\"1\"/>\
<p style=\"margin:0px;margin-left:4px;\">{}</p><hr size=\"1\"/>\
<p style=\"margin:0px;margin-left:4px;\">{}</p>",
        class.name,
        join_lines(&class.attributes),
        join_lines(&class.methods)
    )
}

fn join_lines(entries: &[MemberEntry]) -> String {
    entries
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("<br/>")
}

/// Escape a string for use inside a double-quoted XML attribute
fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
