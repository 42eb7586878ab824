//! Plot generation tests: element counts, geometry shapes and the render pass.

mod common;

use std::thread;

use common::{assert_semantic_error, run_ok};
use plotscript::plot::continuous::MAX_CURVE_POINTS;
use plotscript::plot::geometry::{coordinates, number_property, object_name};
use plotscript::{Expression, Scene, SceneItem};

fn count_named(plot: &Expression, name: &str) -> usize {
    plot.tail()
        .iter()
        .filter(|item| object_name(item) == Some(name))
        .count()
}

// ============================================================================
// DISCRETE PLOT
// ============================================================================

#[test]
fn discrete_plot_without_options_has_fourteen_elements() {
    let plot = run_ok("(discrete-plot (list (list -1 -1) (list 1 1)))");
    assert!(plot.is_list());
    assert_eq!(plot.tail().len(), 14);
    assert_eq!(count_named(&plot, "point"), 2);
    assert_eq!(count_named(&plot, "line"), 4 + 2 + 2);
    assert_eq!(count_named(&plot, "text"), 4);
}

#[test]
fn text_options_add_three_elements() {
    let plot = run_ok(
        r#"(discrete-plot (list (list -1 -1) (list 1 1))
             (list (list "title" "The Title")
                   (list "abscissa-label" "X Label")
                   (list "ordinate-label" "Y Label")))"#,
    );
    assert_eq!(plot.tail().len(), 17);
    assert_eq!(count_named(&plot, "text"), 7);
}

#[test]
fn mapped_range_data_with_options() {
    let plot = run_ok(
        r#"(begin
             (define f (lambda (x) (list x (+ (* 2 x) 1))))
             (discrete-plot (map f (range -2 2 0.5))
               (list (list "title" "The Data")
                     (list "abscissa-label" "X Label")
                     (list "ordinate-label" "Y Label")
                     (list "text-scale" 1))))"#,
    );
    assert_eq!(plot.tail().len(), 31);
}

#[test]
fn discrete_geometry_fits_the_bounding_box() {
    let plot = run_ok("(discrete-plot (list (list 0 0) (list 10 5) (list -10 -5)))");
    for item in plot.tail() {
        if object_name(item) == Some("point") {
            let (x, y) = coordinates(item).expect("point coordinates");
            assert!(x.abs() <= 10.0 + 1e-9 && y.abs() <= 10.0 + 1e-9);
            assert_eq!(number_property(item, "size"), Some(0.5));
        }
    }
}

#[test]
fn title_sits_above_the_frame() {
    let plot = run_ok(r#"(discrete-plot (list (list -1 -1) (list 1 1)) (list (list "title" "T")))"#);
    let title = plot
        .tail()
        .iter()
        .find(|item| item.head().string_contents() == Some("T"))
        .expect("title text");
    let position = title.property("position").and_then(coordinates).expect("title position");
    assert_eq!(position.0, 0.0);
    assert!(position.1 < -10.0);
}

#[test]
fn discrete_plot_rejects_bad_data() {
    assert_semantic_error("(discrete-plot (-1 1))");
    assert_semantic_error("(discrete-plot dog)");
    assert_semantic_error("(discrete-plot (list (list 1)))");
    assert_semantic_error("(discrete-plot (list (list 1 2)) (list (list \"colour\" \"red\")))");
    assert_semantic_error("(discrete-plot (list (list 1 2)) (list (list \"title\" 3)))");
}

// ============================================================================
// CONTINUOUS PLOT
// ============================================================================

#[test]
fn continuous_plot_of_a_sigmoid() {
    let plot = run_ok(
        "(begin (define f (lambda(x) (/ 1 (+ 1 (^ e (- (* 20 x))))))) (continuous-plot f (list -1 1)))",
    );
    assert!(!plot.tail().is_empty());
    // 49 initial segments at least, plus the frame and both axes
    assert!(count_named(&plot, "line") >= 49 + 4 + 2);
    assert_eq!(count_named(&plot, "text"), 4);
}

#[test]
fn continuous_plot_never_exceeds_the_point_budget() {
    let plot = run_ok(
        "(begin (define f (lambda (x) (sin (* 40 x)))) (continuous-plot f (list -3 3)))",
    );
    let lines = count_named(&plot, "line");
    // at most MAX_CURVE_POINTS - 1 segments plus four frame edges and two axes
    assert!(lines <= MAX_CURVE_POINTS - 1 + 6);
}

#[test]
fn sharp_bends_are_refined() {
    let plot = run_ok(
        "(begin (define f (lambda (x) (sin (* 40 x)))) (continuous-plot f (list -3 3)))",
    );
    // four frame edges and both axes are not curve segments
    let segments = count_named(&plot, "line") - 6;
    assert!(segments > 49, "expected refinement, got {} segments", segments);
}

#[test]
fn straight_lines_are_not_refined() {
    let plot = run_ok("(begin (define f (lambda (x) (* 2 x))) (continuous-plot f (list 1 2)))");
    // 49 segments, 4 frame edges, no visible axes
    assert_eq!(count_named(&plot, "line"), 49 + 4);
}

#[test]
fn continuous_plot_rejects_bad_arguments() {
    assert_semantic_error("(continuous-plot (-1 1))");
    assert_semantic_error("(continuous-plot dog)");
    assert_semantic_error("(continuous-plot (5) (list -2 2))");
    assert_semantic_error("(begin (define f (lambda (x) x)) (continuous-plot f (list 2 1)))");
    assert_semantic_error("(begin (define f (lambda (x) (list x))) (continuous-plot f (list 0 1)))");
}

// ============================================================================
// RENDERING
// ============================================================================

#[test]
fn plots_render_to_scene_items() {
    let plot = run_ok("(discrete-plot (list (list -1 -1) (list 1 1)))");
    let scene = Scene::from_expression(&plot).unwrap();
    assert_eq!(scene.items.len(), 14);
    let points = scene
        .items
        .iter()
        .filter(|item| matches!(item, SceneItem::Point { .. }))
        .count();
    assert_eq!(points, 2);
    assert!(scene.to_json().unwrap().contains("\"kind\": \"label\""));
}

#[test]
fn prelude_geometry_renders() {
    let scene = Scene::from_expression(&run_ok(r#"(make-text "hello")"#)).unwrap();
    assert_eq!(
        scene.items,
        vec![SceneItem::Label {
            text: "hello".into(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale: 1.0,
        }]
    );
}

#[test]
fn deep_nesting_hits_the_ceiling_not_the_stack() {
    let handle = thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let mut program = String::from("1");
            for _ in 0..1000 {
                program = format!("(+ 1 {})", program);
            }
            common::run(&program)
        })
        .unwrap();
    let err = handle.join().unwrap().unwrap_err();
    assert!(err.to_string().contains("maximum evaluation depth"));
}
