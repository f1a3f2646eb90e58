// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material assembly: evaluated graph values merged into a renderer
//! material.

use crate::compiler::CompileOutput;
use crate::engine::Engine;
use crate::evaluate::{evaluate, EvalError, EvalSession, Evaluators, TextureRegistry};
use crate::mangle::mangle_name;
use crate::material::{
    merge_uniforms, strip_version_pragma, Material, MaterialSpec, PropertyMap, Uniform, UniformMap,
};
use crate::resolver::DataInputMap;
use shaderlink_graph::Graph;

/// Caller-supplied knobs for one assembly pass
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Material display name
    pub name: String,
    /// Override uniforms merged above graph-resolved values (e.g. a live
    /// `time` uniform)
    pub overrides: UniformMap,
    /// Engine-specific extra properties, assigned after construction and
    /// below graph-resolved properties
    pub extra_properties: PropertyMap,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            name: "Shaderlink Material".to_string(),
            overrides: UniformMap::new(),
            extra_properties: PropertyMap::new(),
        }
    }
}

/// Result of one assembly pass
#[derive(Debug)]
pub struct Assembled {
    /// The constructed material; `material.uniforms` is the final merged
    /// uniform map the per-frame updater mutates in place
    pub material: Material,
    /// Bindings skipped because their evaluation failed
    pub skipped: usize,
}

impl Assembled {
    /// The final uniform map
    pub fn uniforms(&self) -> &UniformMap {
        &self.material.uniforms
    }
}

/// Assemble a renderer material from a compiled program and the resolver's
/// data-input map.
///
/// For every data input with a connecting edge, the edge's source node is
/// evaluated (one shared evaluation session per pass, so shared upstream
/// nodes evaluate once) and the result is routed under its mangled name to
/// the property map or the uniform map. A binding whose evaluation fails is
/// skipped and logged; it never aborts the rest of the pass. Uniform layers
/// merge with a fixed precedence: engine defaults < graph-resolved <
/// caller overrides.
///
/// Assembly only constructs; it never mutates previously assigned
/// materials, so a failed compile upstream leaves the host's state intact.
pub fn assemble(
    graph: &Graph,
    compiled: &CompileOutput,
    data_inputs: &DataInputMap,
    engine: &dyn Engine,
    textures: &TextureRegistry,
    evaluators: &Evaluators,
    options: AssembleOptions,
) -> Assembled {
    let mut resolved_uniforms = UniformMap::new();
    let mut resolved_properties = PropertyMap::new();
    let mut session = EvalSession::new();
    let mut skipped = 0usize;

    for (&node_id, inputs) in data_inputs {
        let Some(owner) = graph.node(node_id) else {
            tracing::warn!(node = %node_id, "data-input map references a node missing from the graph");
            // Inputs without a connecting edge were never bindings.
            skipped += inputs
                .iter()
                .filter(|input| graph.edge_into(node_id, &input.name).is_some())
                .count();
            continue;
        };
        for input in inputs {
            let Some(edge) = graph.edge_into(node_id, &input.name) else {
                // No incoming edge: nothing to bind, not an error.
                continue;
            };
            let Some(source) = graph.node(edge.from) else {
                tracing::warn!(node = %edge.from, "edge source missing from the graph");
                skipped += 1;
                continue;
            };
            let value = match evaluate(graph, source, &mut session, textures, evaluators) {
                Ok(value) => value,
                Err(err @ EvalError::Cycle(_)) => {
                    tracing::warn!(input = %input.name, node = %node_id, %err, "cycle in dataflow, binding skipped");
                    skipped += 1;
                    continue;
                }
                Err(err) => {
                    tracing::warn!(input = %input.name, node = %node_id, %err, "binding evaluation failed, binding skipped");
                    skipped += 1;
                    continue;
                }
            };
            let name = mangle_name(&input.display_name, engine, owner);
            if input.property {
                resolved_properties.insert(name, value);
            } else {
                resolved_uniforms.insert(name, Uniform::new(value));
            }
        }
    }

    // Precedence: engine defaults < graph-resolved < caller overrides.
    let defaults = engine.default_uniform_blocks();
    let mut layers: Vec<&UniformMap> = defaults.iter().collect();
    layers.push(&resolved_uniforms);
    layers.push(&options.overrides);
    let uniforms = merge_uniforms(&layers);

    let (vertex_shader, fragment_shader) = match engine.version_pragma() {
        Some(pragma) => (
            strip_version_pragma(&compiled.vertex, pragma),
            strip_version_pragma(&compiled.fragment, pragma),
        ),
        None => (compiled.vertex.clone(), compiled.fragment.clone()),
    };

    let mut material = Material::new(MaterialSpec {
        name: options.name,
        lights: true,
        uniforms,
        transparent: true,
        opacity: 1.0,
        vertex_shader,
        fragment_shader,
    });

    // Engine-specific extras first, then graph-resolved properties on top;
    // the denylist filter applies to both.
    for (key, value) in &options.extra_properties {
        material.set_extra(key, value.clone());
    }
    for (key, value) in &resolved_properties {
        material.set_extra(key, value.clone());
    }

    Assembled { material, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WebGlEngine;
    use crate::resolver::resolve_data_inputs;
    use shaderlink_graph::{
        make_edge, Graph, IdAllocator, InputSocket, Node, NodeId, Stage, TextureId, Value,
    };

    /// Route skip-path warnings through the test harness's capture
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    /// The Julia fractal demo graph: three literals wired into a source
    /// node's uniforms, through a physical material, into the fragment
    /// sink; a matching vertex chain on the other stage.
    struct Fixture {
        graph: Graph,
        julia_f: NodeId,
        compiled: CompileOutput,
    }

    fn julia_fixture() -> Fixture {
        let mut ids = IdAllocator::new();
        let mut graph = Graph::new();

        let start = Node::literal(
            ids.next_node(),
            "start",
            Stage::Fragment,
            Value::Vector2([-0.2307, 0.6923]),
        );
        let iter = Node::literal(ids.next_node(), "iter", Stage::Fragment, Value::Int(8));
        let color = Node::literal(
            ids.next_node(),
            "fractal_color",
            Stage::Fragment,
            Value::Color([0.0, 0.9, 0.1]),
        );

        let julia_f = Node::source(ids.next_node(), "Julia", Stage::Fragment, "gl_FragColor...")
            .with_inputs(vec![
                InputSocket::new("uniform_start").with_display_name("start"),
                InputSocket::new("uniform_iter").with_display_name("iter"),
                InputSocket::new("uniform_fractal_color").with_display_name("fractal_color"),
            ]);
        let julia_v = Node::source(ids.next_node(), "Julia", Stage::Vertex, "gl_Position...")
            .with_linked(julia_f.id);

        let group = ids.next_raw();
        let physical_f = Node::physical(ids.next_node(), "Physical", group, Stage::Fragment)
            .with_inputs(vec![InputSocket::new("property_normalMap")
                .with_display_name("normalMap")
                .property()]);
        let physical_v = Node::physical(ids.next_node(), "Physical", group, Stage::Vertex)
            .with_linked(physical_f.id);

        let sink_f = Node::output(ids.next_node(), "Output", Stage::Fragment);
        let sink_v = Node::output(ids.next_node(), "Output", Stage::Vertex);

        let julia_f_id = julia_f.id;
        let edges = vec![
            make_edge(&mut ids, &start, julia_f.id, "uniform_start", Stage::Fragment).unwrap(),
            make_edge(&mut ids, &iter, julia_f.id, "uniform_iter", Stage::Fragment).unwrap(),
            make_edge(&mut ids, &color, julia_f.id, "uniform_fractal_color", Stage::Fragment)
                .unwrap(),
            make_edge(&mut ids, &julia_f, physical_f.id, "property_normalMap", Stage::Fragment)
                .unwrap(),
            make_edge(&mut ids, &physical_f, sink_f.id, "frag_out", Stage::Fragment).unwrap(),
            make_edge(&mut ids, &physical_v, sink_v.id, "gl_position", Stage::Vertex).unwrap(),
        ];

        let compiled = CompileOutput {
            vertex: "#version 300 es\nvoid main() {}".to_string(),
            fragment: "#version 300 es\nvoid main() {}".to_string(),
            vertex_sink: sink_v.id,
            fragment_sink: sink_f.id,
        };

        for node in [start, iter, color, julia_f, julia_v, physical_f, physical_v, sink_f, sink_v] {
            graph.add_node(node);
        }
        for edge in edges {
            graph.add_edge(edge).unwrap();
        }

        Fixture {
            graph,
            julia_f: julia_f_id,
            compiled,
        }
    }

    fn assemble_fixture(fixture: &Fixture, options: AssembleOptions) -> Assembled {
        let engine = WebGlEngine::new();
        let data_inputs = resolve_data_inputs(
            &fixture.graph,
            &[fixture.compiled.fragment_sink, fixture.compiled.vertex_sink],
            &engine,
        );
        assemble(
            &fixture.graph,
            &fixture.compiled,
            &data_inputs,
            &engine,
            &TextureRegistry::new(),
            &Evaluators::new(),
            options,
        )
    }

    #[test]
    fn test_julia_end_to_end_binding() {
        let fixture = julia_fixture();
        let assembled = assemble_fixture(&fixture, AssembleOptions::default());
        let uniforms = assembled.uniforms();

        let julia = fixture.julia_f;
        assert_eq!(
            uniforms[&format!("start_{julia}")].value,
            Value::Vector2([-0.2307, 0.6923])
        );
        assert_eq!(uniforms[&format!("iter_{julia}")].value, Value::Int(8));
        assert_eq!(
            uniforms[&format!("fractal_color_{julia}")].value,
            Value::Color([0.0, 0.9, 0.1])
        );

        // Superset over the engine's base lighting uniforms.
        assert!(uniforms.contains_key("ambientLightColor"));
        assert!(uniforms.contains_key("roughness"));
        assert_eq!(assembled.skipped, 1); // normalMap fed by a source node
    }

    #[test]
    fn test_non_data_binding_skipped_but_pass_completes() {
        // property_normalMap is fed by the Julia source node, which has no
        // evaluation function; that binding is dropped, the uniforms above
        // it still bind.
        init_tracing();
        let fixture = julia_fixture();
        let assembled = assemble_fixture(&fixture, AssembleOptions::default());
        assert!(assembled.material.extra().is_empty());
        assert!(assembled
            .uniforms()
            .contains_key(&format!("iter_{}", fixture.julia_f)));
    }

    #[test]
    fn test_overrides_beat_graph_and_defaults() {
        let fixture = julia_fixture();
        let mut options = AssembleOptions::default();
        options
            .overrides
            .insert("time".to_string(), Uniform::new(Value::Float(0.0)));
        options.overrides.insert(
            format!("iter_{}", fixture.julia_f),
            Uniform::new(Value::Int(99)),
        );

        let assembled = assemble_fixture(&fixture, options);
        assert_eq!(assembled.uniforms()["time"].value, Value::Float(0.0));
        assert_eq!(
            assembled.uniforms()[&format!("iter_{}", fixture.julia_f)].value,
            Value::Int(99)
        );
    }

    #[test]
    fn test_version_pragma_stripped() {
        let fixture = julia_fixture();
        let assembled = assemble_fixture(&fixture, AssembleOptions::default());
        assert!(!assembled.material.vertex_shader.contains("#version"));
        assert!(!assembled.material.fragment_shader.contains("#version"));
    }

    #[test]
    fn test_extra_properties_filtered_and_applied() {
        let fixture = julia_fixture();
        let mut options = AssembleOptions::default();
        options
            .extra_properties
            .insert("roughness_factor".to_string(), Value::Float(0.0));
        options
            .extra_properties
            .insert("uuid".to_string(), Value::String("nope".to_string()));
        options
            .extra_properties
            .insert("_hidden".to_string(), Value::Bool(true));

        let assembled = assemble_fixture(&fixture, options);
        let extra = assembled.material.extra();
        assert_eq!(extra["roughness_factor"], Value::Float(0.0));
        assert!(!extra.contains_key("uuid"));
        assert!(!extra.contains_key("_hidden"));
    }

    #[test]
    fn test_stale_map_entry_without_edges_skips_nothing() {
        // A data-input map entry for a node the graph no longer has, whose
        // inputs have no connecting edges: there were no bindings to skip.
        init_tracing();
        let fixture = julia_fixture();
        let engine = WebGlEngine::new();
        let mut data_inputs = resolve_data_inputs(
            &fixture.graph,
            &[fixture.compiled.fragment_sink, fixture.compiled.vertex_sink],
            &engine,
        );
        data_inputs.insert(
            NodeId(404),
            vec![InputSocket::new("uniform_a"), InputSocket::new("uniform_b")],
        );

        let assembled = assemble(
            &fixture.graph,
            &fixture.compiled,
            &data_inputs,
            &engine,
            &TextureRegistry::new(),
            &Evaluators::new(),
            AssembleOptions::default(),
        );
        // Only the normalMap binding (fed by a source node) is skipped.
        assert_eq!(assembled.skipped, 1);
    }

    #[test]
    fn test_property_input_routes_to_extras() {
        let mut fixture = julia_fixture();
        // Rewire normalMap to a texture node so the property binding
        // succeeds.
        let mut ids = IdAllocator::new();
        let tex = Node::texture(NodeId(40), "Bricks", Stage::Fragment, "bricks");
        let physical_f = fixture
            .graph
            .nodes()
            .find(|n| n.kind == shaderlink_graph::NodeKind::PhysicalMaterial && n.stage == Stage::Fragment)
            .unwrap()
            .clone();

        let mut graph = Graph::new();
        for node in fixture.graph.nodes() {
            graph.add_node(node.clone());
        }
        graph.add_node(tex.clone());
        for edge in fixture.graph.edges() {
            if edge.input != "property_normalMap" {
                graph.add_edge(edge.clone()).unwrap();
            }
        }
        let edge = make_edge(&mut ids, &tex, physical_f.id, "property_normalMap", Stage::Fragment)
            .unwrap();
        graph.add_edge(edge).unwrap();
        fixture.graph = graph;

        let engine = WebGlEngine::new();
        let data_inputs = resolve_data_inputs(
            &fixture.graph,
            &[fixture.compiled.fragment_sink, fixture.compiled.vertex_sink],
            &engine,
        );
        let mut textures = TextureRegistry::new();
        textures.insert("bricks", TextureId(7));
        let assembled = assemble(
            &fixture.graph,
            &fixture.compiled,
            &data_inputs,
            &engine,
            &textures,
            &Evaluators::new(),
            AssembleOptions::default(),
        );

        let key = format!("normalMap_{}", physical_f.id);
        assert_eq!(assembled.material.extra()[&key], Value::Texture(TextureId(7)));
        assert!(!assembled.uniforms().contains_key(&key));
        assert_eq!(assembled.skipped, 0);
    }
}
