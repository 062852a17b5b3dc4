//! Integration tests: snapshot / export JSON → markup.

use fw_core::normalize::CHILD_COUNT_MISMATCH;
use fw_core::emitter::{IMAGE_EMBED_UNAVAILABLE, IMAGE_PLACEHOLDER};
use fw_core::{
    GenerationMode, NoVariables, RawNode, Settings, SnapshotNode, StaticVariables, convert,
};
use pretty_assertions::assert_eq;
use std::rc::Rc;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn snapshot(text: &str) -> Vec<SnapshotNode> {
    SnapshotNode::load_selection(text).expect("fixture should parse")
}

fn mirrored(text: &str) -> Vec<SnapshotNode> {
    let raw = RawNode::from_json(text).expect("fixture should parse");
    vec![SnapshotNode::mirror(&raw)]
}

// ─── Fixture-based tests ─────────────────────────────────────────────────

#[tokio::test]
async fn rectangle_is_placed_absolutely_and_self_closes() {
    init_logging();
    let nodes = snapshot(include_str!("fixtures/rectangle.json"));
    let result = convert(&nodes, Settings::default(), Rc::new(NoVariables))
        .await
        .unwrap();

    assert_eq!(
        result.code,
        r#"<div className="w-[100px] h-[50px] left-0 top-0 absolute" />"#
    );
    assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn rectangle_in_html_mode_uses_a_close_tag() {
    let nodes = snapshot(include_str!("fixtures/rectangle.json"));
    let settings = Settings {
        generation_mode: GenerationMode::Html,
        ..Settings::default()
    };
    let result = convert(&nodes, settings, Rc::new(NoVariables)).await.unwrap();

    assert_eq!(
        result.code,
        r#"<div class="w-[100px] h-[50px] left-0 top-0 absolute"></div>"#
    );
}

#[tokio::test]
async fn image_fill_becomes_placeholder_img() {
    let nodes = snapshot(include_str!("fixtures/image_fill.json"));
    let result = convert(&nodes, Settings::default(), Rc::new(NoVariables))
        .await
        .unwrap();

    assert_eq!(
        result.code,
        r#"<img className="w-16 h-16 left-0 top-0 absolute" src="https://placehold.co/64x64" />"#
    );
    assert_eq!(result.warnings, vec![IMAGE_PLACEHOLDER.to_string()]);
}

#[tokio::test]
async fn image_fill_with_children_becomes_a_background() {
    let nodes = mirrored(include_str!("fixtures/hero_image.json"));
    let result = convert(&nodes, Settings::default(), Rc::new(NoVariables))
        .await
        .unwrap();

    let expected = [
        r#"<div className="w-16 h-16 left-0 top-0 absolute bg-[url(https://placehold.co/64x64)]">"#,
        r#"  <div className="w-2 h-2 left-[8px] top-[8px] absolute" />"#,
        "</div>",
    ]
    .join("\n");
    assert_eq!(result.code, expected);
    assert_eq!(result.warnings, vec![IMAGE_PLACEHOLDER.to_string()]);
}

#[tokio::test]
async fn embed_request_warns_that_images_are_placeholders() {
    let nodes = snapshot(include_str!("fixtures/image_fill.json"));
    let settings = Settings {
        embed_images: true,
        ..Settings::default()
    };
    let result = convert(&nodes, settings, Rc::new(NoVariables)).await.unwrap();

    assert!(result.code.starts_with("<img "));
    assert_eq!(result.warnings, vec![IMAGE_EMBED_UNAVAILABLE.to_string()]);
}

#[tokio::test]
async fn clipping_frame_hides_overflow() {
    let nodes = mirrored(include_str!("fixtures/viewport.json"));
    let result = convert(&nodes, Settings::default(), Rc::new(NoVariables))
        .await
        .unwrap();

    let expected = [
        r#"<div className="w-[100px] h-10 left-0 top-0 absolute overflow-hidden">"#,
        r#"  <div className="w-[120px] h-10 left-0 top-0 absolute" />"#,
        "</div>",
    ]
    .join("\n");
    assert_eq!(result.code, expected);
}

#[tokio::test]
async fn section_wraps_children_with_its_fill() {
    let nodes = mirrored(include_str!("fixtures/section.json"));
    let result = convert(&nodes, Settings::default(), Rc::new(NoVariables))
        .await
        .unwrap();

    let expected = [
        r#"<div className="w-[200px] h-[100px] left-0 top-0 absolute bg-white">"#,
        r#"  <div className="w-2 h-2 left-[10px] top-[10px] absolute" />"#,
        "</div>",
    ]
    .join("\n");
    assert_eq!(result.code, expected);
}

#[tokio::test]
async fn line_becomes_an_outlined_div_with_a_close_tag() {
    let nodes = mirrored(include_str!("fixtures/divider.json"));
    let result = convert(&nodes, Settings::default(), Rc::new(NoVariables))
        .await
        .unwrap();

    assert_eq!(
        result.code,
        r#"<div className="w-[100px] h-0 left-0 top-[10px] absolute outline outline-1 outline-offset-[-0.5px] outline-black"></div>"#
    );
}

#[tokio::test]
async fn auto_layout_card_renders_flex_column() {
    let nodes = mirrored(include_str!("fixtures/card.json"));
    let result = convert(&nodes, Settings::default(), Rc::new(NoVariables))
        .await
        .unwrap();

    let expected = [
        r#"<div className="w-[132px] h-[72px] p-4 left-0 top-0 absolute bg-white rounded-lg inline-flex flex-col justify-start items-start gap-2">"#,
        r#"  <div className="w-[100px] h-5" />"#,
        r#"  <div className="w-[100px] h-5" />"#,
        "</div>",
    ]
    .join("\n");
    assert_eq!(result.code, expected);

    let names: Vec<_> = result.tree[0]
        .children
        .iter()
        .map(|child| child.unique_name.as_str())
        .collect();
    assert_eq!(names, vec!["Row", "Row_01"]);
}

#[tokio::test]
async fn two_text_runs_become_two_spans() {
    let nodes = mirrored(include_str!("fixtures/greeting_text.json"));
    let result = convert(&nodes, Settings::default(), Rc::new(NoVariables))
        .await
        .unwrap();

    assert_eq!(
        result.code,
        concat!(
            r#"<div className="left-[10px] top-[20px] absolute">"#,
            r#"<span className="text-black text-base font-normal font-['Inter']">Hello </span>"#,
            r#"<span className="text-black text-base font-bold font-['Inter']">World</span>"#,
            "</div>"
        )
    );
    assert_eq!(result.text_styles.len(), 2);
    assert_eq!(result.text_styles[0].unique_id, "greeting_span_01");
    assert_eq!(result.text_styles[1].text, "World");
    assert!(result.text_styles_report().starts_with("// Hello \ntext-black\n"));
}

#[tokio::test]
async fn superscript_and_subscript_runs_get_their_own_tags() {
    let nodes = mirrored(include_str!("fixtures/formula_text.json"));
    let result = convert(&nodes, Settings::default(), Rc::new(NoVariables))
        .await
        .unwrap();

    assert_eq!(
        result.code,
        concat!(
            r#"<div className="left-0 top-0 absolute">"#,
            r#"<span className="text-black text-base font-normal font-['Inter']">x</span>"#,
            r#"<sup className="text-black text-base font-normal font-['Inter']">2</sup>"#,
            r#"<sub className="text-black text-base font-normal font-['Inter']">y</sub>"#,
            "</div>"
        )
    );
}

#[tokio::test]
async fn child_count_mismatch_warns_without_failing() {
    let nodes = snapshot(include_str!("fixtures/mismatch.json"));
    let result = convert(&nodes, Settings::default(), Rc::new(NoVariables))
        .await
        .unwrap();

    assert_eq!(result.warnings, vec![CHILD_COUNT_MISMATCH.to_string()]);
    assert_eq!(result.tree[0].children.len(), 3);
    assert_eq!(result.code.matches("w-2.5 h-2.5").count(), 3);
}

#[tokio::test]
async fn bound_color_variable_names_the_background() {
    let text = r#"{
        "id": "3:1",
        "name": "Swatch",
        "type": "RECTANGLE",
        "absoluteBoundingBox": { "x": 0, "y": 0, "width": 16, "height": 16 },
        "fills": [{
            "type": "SOLID",
            "color": { "r": 0.1, "g": 0.2, "b": 0.3 },
            "boundVariables": { "color": { "id": "VariableID:1:1", "type": "VARIABLE_ALIAS" } }
        }]
    }"#;
    let variables = StaticVariables::from_json(r#"{ "VariableID:1:1": "Brand/Primary" }"#).unwrap();
    let settings = Settings {
        use_color_variables: true,
        ..Settings::default()
    };
    let result = convert(&mirrored(text), settings, Rc::new(variables))
        .await
        .unwrap();

    assert_eq!(
        result.code,
        r#"<div className="w-4 h-4 left-0 top-0 absolute bg-brand-primary" />"#
    );
}

#[tokio::test]
async fn unresolvable_variable_fails_the_call() {
    let text = r#"{
        "id": "3:1",
        "name": "Swatch",
        "type": "RECTANGLE",
        "fills": [{
            "type": "SOLID",
            "color": { "r": 0, "g": 0, "b": 0 },
            "boundVariables": { "color": { "id": "VariableID:9:9" } }
        }]
    }"#;
    let settings = Settings {
        use_color_variables: true,
        ..Settings::default()
    };
    let err = convert(&mirrored(text), settings, Rc::new(NoVariables))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("VariableID:9:9"));
}

#[tokio::test]
async fn custom_prefix_applies_to_every_token() {
    let nodes = snapshot(include_str!("fixtures/rectangle.json"));
    let settings = Settings::from_json(r#"{ "customTailwindPrefix": "tw-" }"#).unwrap();
    let result = convert(&nodes, settings, Rc::new(NoVariables)).await.unwrap();

    assert_eq!(
        result.code,
        r#"<div className="tw-w-[100px] tw-h-[50px] tw-left-0 tw-top-0 tw-absolute" />"#
    );
}
