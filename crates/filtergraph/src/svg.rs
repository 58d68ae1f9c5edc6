use std::fmt::Write as _;

use crate::{FilterGraph, FilterStage};

/// Renders the graph as a standalone SVG filter document.
///
/// The svg node is styled to take no layout space; consumers reference the
/// filter by `url(#id)`. `color-interpolation-filters` is pinned to sRGB so
/// the displacement byte encoding survives the filter chain unchanged.
pub fn to_svg_document(graph: &FilterGraph) -> String {
    let mut out = String::new();
    out.push_str(
        "<svg style=\"display:none;position:absolute;width:0;height:0\" \
         color-interpolation-filters=\"sRGB\" xmlns=\"http://www.w3.org/2000/svg\">\n",
    );
    out.push_str("  <defs>\n");
    let _ = writeln!(out, "    <filter id=\"{}\">", graph.id);

    for stage in &graph.stages {
        write_stage(&mut out, stage);
    }

    out.push_str("    </filter>\n  </defs>\n</svg>\n");
    out
}

fn write_stage(out: &mut String, stage: &FilterStage) {
    match stage {
        FilterStage::GaussianBlur {
            input,
            std_deviation,
            result,
        } => {
            let _ = writeln!(
                out,
                "      <feGaussianBlur in=\"{input}\" stdDeviation=\"{std_deviation}\" result=\"{result}\"/>"
            );
        }
        FilterStage::Image {
            href,
            width,
            height,
            result,
        } => {
            let _ = writeln!(
                out,
                "      <feImage href=\"{href}\" x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" result=\"{result}\"/>"
            );
        }
        FilterStage::DisplacementMap {
            input,
            map,
            scale,
            x_channel,
            y_channel,
            result,
        } => {
            let _ = writeln!(
                out,
                "      <feDisplacementMap in=\"{input}\" in2=\"{map}\" scale=\"{scale}\" \
                 xChannelSelector=\"{x_channel}\" yChannelSelector=\"{y_channel}\" result=\"{result}\"/>"
            );
        }
        FilterStage::Saturate {
            input,
            amount,
            result,
        } => {
            let _ = writeln!(
                out,
                "      <feColorMatrix in=\"{input}\" type=\"saturate\" values=\"{amount}\" result=\"{result}\"/>"
            );
        }
        FilterStage::CompositeIn {
            input,
            mask,
            result,
        } => {
            let _ = writeln!(
                out,
                "      <feComposite in=\"{input}\" in2=\"{mask}\" operator=\"in\" result=\"{result}\"/>"
            );
        }
        FilterStage::AlphaSlope {
            input,
            slope,
            result,
        } => {
            let _ = writeln!(
                out,
                "      <feComponentTransfer in=\"{input}\" result=\"{result}\">\n        \
                 <feFuncA type=\"linear\" slope=\"{slope}\"/>\n      </feComponentTransfer>"
            );
        }
        FilterStage::BlendOver {
            input,
            backdrop,
            result,
        } => match result {
            Some(result) => {
                let _ = writeln!(
                    out,
                    "      <feBlend in=\"{input}\" in2=\"{backdrop}\" mode=\"normal\" result=\"{result}\"/>"
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "      <feBlend in=\"{input}\" in2=\"{backdrop}\" mode=\"normal\"/>"
                );
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assemble, FilterParams};

    #[test]
    fn document_wraps_filter_in_hidden_defs() {
        let graph = assemble("glass-bar-1", 64, 32, &FilterParams::default());
        let doc = to_svg_document(&graph);
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains("display:none"));
        assert!(doc.contains("color-interpolation-filters=\"sRGB\""));
        assert!(doc.contains("<filter id=\"glass-bar-1\">"));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn stages_serialize_in_graph_order() {
        let graph = assemble("glass-bar-1", 64, 32, &FilterParams::default());
        let doc = to_svg_document(&graph);
        let order = [
            "<feGaussianBlur",
            "result=\"disp_map\"",
            "<feDisplacementMap",
            "<feColorMatrix",
            "result=\"spec_layer\"",
            "<feComposite",
            "<feComponentTransfer",
            "<feBlend",
        ];
        let mut cursor = 0;
        for needle in order {
            let at = doc[cursor..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing '{needle}' after byte {cursor}"));
            cursor += at + needle.len();
        }
    }

    #[test]
    fn displacement_channels_are_red_and_green() {
        let graph = assemble("glass-bar-1", 64, 32, &FilterParams::default());
        let doc = to_svg_document(&graph);
        assert!(doc.contains("xChannelSelector=\"R\""));
        assert!(doc.contains("yChannelSelector=\"G\""));
    }

    #[test]
    fn alpha_fade_uses_the_specular_opacity() {
        let params = FilterParams {
            specular_opacity: 0.25,
            ..FilterParams::default()
        };
        let graph = assemble("glass-bar-1", 64, 32, &params);
        let doc = to_svg_document(&graph);
        assert!(doc.contains("<feFuncA type=\"linear\" slope=\"0.25\"/>"));
    }
}
