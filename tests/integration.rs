use segspace_engine::Engine;
use segspace_engine::color::{LUT_SIZE, Palette, parse_lut_export};
use segspace_engine::field::{FieldKind, solar_system_bodies};
use segspace_engine::geom::expected_counts;
use segspace_engine::parse::sample_ephemerides_json;

fn small_engine() -> Engine {
    let mut engine = Engine::new().expect("default engine");
    engine.rebuild_mesh(10.0, 2).expect("valid mesh");
    engine
}

#[test]
fn engine_starts_with_default_mesh_and_solar_system() {
    let engine = Engine::new().expect("default engine");
    let (vertices, faces) = expected_counts(5).expect("counts");

    assert_eq!(engine.positions().len(), vertices * 3);
    assert_eq!(engine.indices().len(), faces * 3);
    assert_eq!(engine.body_count(), solar_system_bodies().len());
    assert_eq!(engine.palette(), "turbo");
    assert_eq!(engine.color_mode(), "density");
    assert!(!engine.has_fields());
}

#[test]
fn color_queries_require_computed_fields() {
    let mut engine = small_engine();
    assert!(engine.vertex_colors().is_err());
    assert!(engine.edge_colors().is_err());
    assert!(engine.field_values().is_err());

    engine.compute_fields();
    let (vertices, _) = expected_counts(2).expect("counts");
    assert_eq!(engine.vertex_colors().expect("colors").len(), vertices * 3);
    assert_eq!(engine.field_values().expect("values").len(), vertices);

    let edges = engine.edge_indices().len() / 2;
    assert_eq!(engine.edge_colors().expect("edge colors").len(), edges * 3);
}

#[test]
fn changing_inputs_marks_fields_stale() {
    let mut engine = small_engine();
    engine.compute_fields();
    assert!(engine.has_fields());

    engine.set_params(2.0, 0.1, 4.0, 1.0, 0.015);
    assert!(!engine.has_fields());
    assert!(engine.vertex_colors().is_err());

    engine.compute_fields();
    let range = engine.field_range().expect("range");
    assert!(range[0] >= 0.1 && range[1] <= 4.0, "{range:?}");

    engine.set_body_enabled("Jupiter", false).expect("known body");
    assert!(!engine.has_fields());
}

#[test]
fn loading_bodies_replaces_the_scene() {
    let mut engine = small_engine();
    let count = engine
        .load_bodies(sample_ephemerides_json())
        .expect("sample payload");
    assert_eq!(count, 3);
    assert_eq!(engine.body_count(), 3);
    assert_eq!(engine.scene().bodies[1].name, "Earth");
}

#[test]
fn rejected_body_payloads_leave_bodies_untouched() {
    let mut engine = small_engine();
    let before = engine.scene().bodies.clone();

    assert!(engine.load_bodies("{\"name\": \"Sun\"}").is_err());
    assert!(engine.load_bodies("not json").is_err());
    assert!(engine.load_bodies("[]").is_err());

    assert_eq!(engine.scene().bodies, before);
}

#[test]
fn disabling_bodies_filters_in_order() {
    let mut engine = small_engine();
    engine.set_body_enabled("Mercury", false).expect("known body");
    engine.set_body_enabled("Mars", false).expect("known body");

    let names: Vec<&str> = engine.scene().bodies.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Sun", "Venus", "Earth", "Jupiter", "Saturn"]);

    engine.set_body_enabled("Mars", true).expect("known body");
    assert_eq!(engine.body_count(), 6);
    assert!(engine.set_body_enabled("Vulcan", false).is_err());

    engine.load_solar_system();
    assert_eq!(engine.body_count(), 7);
}

#[test]
fn configure_applies_partial_json() {
    let mut engine = Engine::new().expect("default engine");
    engine
        .configure(r#"{"subdivisions": 1, "radius": 2.0, "palette": "plasma", "colorMode": "refractiveIndex"}"#)
        .expect("valid config");

    assert_eq!(engine.positions().len(), expected_counts(1).expect("counts").0 * 3);
    assert_eq!(engine.config().palette, Palette::Plasma);
    assert_eq!(engine.config().color_mode, FieldKind::RefractiveIndex);
    assert_eq!(engine.config().params.kappa, 0.015);

    engine.compute_fields();
    let range = engine.field_range().expect("range");
    assert!(range[0] >= 1.0);
}

#[test]
fn configure_merges_onto_current_settings() {
    let mut engine = small_engine();
    engine.set_params(1.5, 0.2, 3.0, 2.0, 0.1);
    let params = engine.config().params;

    engine
        .configure(r#"{"palette": "plasma"}"#)
        .expect("palette-only config");

    assert_eq!(engine.palette(), "plasma");
    assert_eq!(engine.positions().len(), expected_counts(2).expect("counts").0 * 3);
    assert_eq!(engine.config().params, params);
    assert_eq!(engine.scene().params, params);

    engine
        .configure(r#"{"params": {"alpha": 0.5}}"#)
        .expect("params-only config");
    assert_eq!(engine.config().params.alpha, 0.5);
    assert_eq!(engine.config().params.max_density, 3.0);
}

#[test]
fn palette_only_configure_keeps_computed_fields() {
    let mut engine = small_engine();
    engine.compute_fields();
    engine
        .configure(r#"{"palette": "greys", "colorMode": "tau"}"#)
        .expect("valid config");
    assert!(engine.has_fields());

    engine.configure(r#"{"radius": 4.0}"#).expect("valid config");
    assert!(!engine.has_fields());
}

#[test]
fn color_mode_names_match_between_setter_and_config() {
    for name in ["N", "n", "TAU", "tau", "NIDX", "density", "timeDilation", "refractiveIndex"] {
        let mut by_setter = small_engine();
        let mut by_config = small_engine();
        by_setter.set_color_mode(name).expect("setter accepts name");
        by_config
            .configure(&format!(r#"{{"colorMode": "{name}"}}"#))
            .expect("config accepts name");
        assert_eq!(by_setter.color_mode(), by_config.color_mode(), "{name}");
    }

    let mut engine = small_engine();
    engine.set_color_mode("N").expect("density shorthand");
    assert_eq!(engine.color_mode(), "density");
    engine.set_color_mode("n").expect("refractive index shorthand");
    assert_eq!(engine.color_mode(), "refractiveIndex");
    engine.set_color_mode("NIDX").expect("refractive index selector");
    assert_eq!(engine.color_mode(), "refractiveIndex");
    assert!(engine.configure(r#"{"colorMode": "pressure"}"#).is_err());
}

#[test]
fn invalid_configuration_is_ignored() {
    let mut engine = small_engine();
    let before = engine.config().clone();

    assert!(engine.configure("{\"radius\": \"big\"}").is_err());
    assert!(engine.configure(r#"{"radius": -5.0}"#).is_err());
    assert!(engine.configure(r#"{"subdivisions": 99}"#).is_err());
    assert!(engine.rebuild_mesh(0.0, 1).is_err());

    assert_eq!(engine.config(), &before);
    assert_eq!(engine.positions().len(), expected_counts(2).expect("counts").0 * 3);
}

#[test]
fn palette_and_color_mode_selection() {
    let mut engine = small_engine();
    engine.set_palette("Viridis").expect("known palette");
    assert_eq!(engine.palette(), "viridis");
    assert!(engine.set_palette("viridus").is_err());
    assert_eq!(engine.palette(), "viridis");

    engine.set_color_mode("tau").expect("alias");
    assert_eq!(engine.color_mode(), "timeDilation");
    assert!(engine.set_color_mode("temperature").is_err());

    let legend = engine.legend(16);
    assert_eq!(legend.len(), 16 * 3);
    assert_eq!(&legend[..3], &[68, 1, 84]);
    assert_eq!(&legend[45..], &[253, 231, 37]);
}

#[test]
fn exported_luts_reparse() {
    let engine = small_engine();
    let json = engine.export_luts().expect("export");
    let parsed = parse_lut_export(&json).expect("reparse");

    assert_eq!(parsed.metadata.size, LUT_SIZE);
    for palette in Palette::ALL {
        assert_eq!(parsed.table(palette).map(<[_]>::len), Some(LUT_SIZE));
    }
}

#[test]
fn orbit_and_spiral_points() {
    let engine = small_engine();
    let earth = engine.orbit_points("Earth").expect("earth orbit");
    assert_eq!(earth.len() % 3, 0);
    assert_eq!(earth.len() / 3, 220);
    assert!(engine.orbit_points("Pluto").is_err());

    let spiral = engine.spiral_points("Earth", 0.05, 2.0, 30).expect("spiral");
    assert_eq!(spiral.len(), 2 * 30 * 3);
    assert!(engine.spiral_points("Vulcan", 0.05, 2.0, 30).is_err());
}

#[test]
fn status_line_mentions_mesh_and_params() {
    let engine = small_engine();
    let status = engine.status();
    assert!(status.starts_with("Icosphere: 162 vertices, 320 faces"), "{status}");
    assert!(status.ends_with("Params(p=2.0, N_bg=0.000, N_max=5.0, α=1.00, κ=0.015)"));
}
