//! Demo target scene: a small card game screen with flex layout and filters.

use crate::scene::{NodeSpec, RawUniform, Scene, ShaderFilter};
use scenelens_protocol::UniformValue;

pub fn demo_scene() -> Scene {
    let mut scene = Scene::new();
    let root = scene.set_root(
        NodeSpec::new("Container")
            .labeled("GameScene")
            .style("width", 800)
            .style("height", 600)
            .style("flexDirection", "column")
            .style("gap", 10)
            .computed(800.0, 600.0),
    );

    scene.add_child(
        root,
        NodeSpec::new("Container")
            .labeled("Header")
            .style("height", 80)
            .style("justifyContent", "space-between")
            .style("padding", 12)
            .computed(800.0, 80.0),
    );

    let board = scene.add_child(
        root,
        NodeSpec::new("Container")
            .labeled("Board")
            .style("flexWrap", "wrap")
            .style("flexGrow", 1)
            .style("gap", 8)
            .computed(800.0, 420.0),
    );
    for i in 0..3 {
        scene.add_child(
            board,
            NodeSpec::new("Sprite")
                .labeled(&format!("Card{i}"))
                .anchored(0.5, 0.5)
                .style("width", 120)
                .style("height", 160)
                .bounds(120.0, 160.0)
                .filter(glow_filter(i as f64 * 0.25)),
        );
    }

    let footer = scene.add_child(
        root,
        NodeSpec::new("Container").labeled("Footer").style("height", "auto").bounds(800.0, 60.0),
    );
    // Decorative, outside layout and unlabeled.
    scene.add_child(footer, NodeSpec::new("Graphics").at(4.0, 4.0).bounds(792.0, 52.0));

    scene
}

fn glow_filter(progress: f64) -> ShaderFilter {
    ShaderFilter::new("GlowFilter").group(
        "glowUniforms",
        vec![
            RawUniform::new("uColor", UniformValue::Vector(vec![1.0, 0.8, 0.2])).declared("vec3<f32>"),
            RawUniform::new("uStrength", UniformValue::Scalar(4.0)).declared("f32"),
            RawUniform::new("uProgress", UniformValue::Scalar(progress)),
            RawUniform::new("uInputSize", UniformValue::Vector(vec![120.0, 160.0, 0.0, 0.0])),
        ],
    )
}
