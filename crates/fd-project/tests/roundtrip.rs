use fd_project::*;

fn diamond() -> Project {
    let node = |id: &str, x: f64, y: f64, role: NodeRole| NodeDef {
        id: id.to_string(),
        coords: [x, y, 0.0],
        role,
    };
    let edge = |tail: &str, head: &str, frac: u32| EdgeDef {
        tail: tail.to_string(),
        head: head.to_string(),
        length_cm: 11.2,
        frac: Some(frac),
        aperture: ApertureDef::Uniform {
            alpha_cm: 0.02,
            beta_cm: 10.0,
        },
    };
    Project {
        version: 1,
        name: "Diamond".to_string(),
        run: RunDef {
            remesh: Some(RemeshDef {
                start_years: 30.0,
                interval_years: 100.0,
            }),
            ..RunDef::default()
        },
        chemistry: ChemistryDef {
            dx: Some(0.05),
            ..ChemistryDef::default()
        },
        channel: None,
        network: Some(NetworkDef {
            nodes: vec![
                node("s", 0.0, 0.0, NodeRole::Source),
                node("a", 10.0, 5.0, NodeRole::Interior),
                node("b", 10.0, -5.0, NodeRole::Interior),
                node("t", 20.0, 0.0, NodeRole::Target),
            ],
            edges: vec![
                edge("s", "a", 1),
                edge("s", "b", 2),
                edge("a", "t", 3),
                edge("b", "t", 4),
            ],
        }),
    }
}

#[test]
fn roundtrip_yaml_network() {
    let project = diamond();
    let path = std::env::temp_dir().join("fd_project_roundtrip_network.yaml");

    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json_network() {
    let project = diamond();
    let path = std::env::temp_dir().join("fd_project_roundtrip_network.json");

    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn minimal_yaml_takes_defaults() {
    let project = from_yaml_str(
        "version: 1\nname: bare\nchannel: {length_cm: 10.0, alpha_cm: 0.01, beta_cm: 1.0, hgrad: 0.1}\n",
    )
    .unwrap();
    assert_eq!(project.run, RunDef::default());
    assert_eq!(project.run.discretization, DiscretizationDef::Dc);
    assert_eq!(project.run.source_head, 1000.0);
    assert!(project.run.preprocess);
}

#[test]
fn invalid_project_is_not_saved() {
    let mut project = diamond();
    project.run.duration_years = -1.0;
    let path = std::env::temp_dir().join("fd_project_roundtrip_invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &project),
        Err(ProjectError::Validation(_))
    ));
}
