use std::path::Path;

#[test]
fn demos_load_and_compile() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/projects");

    let channel = fd_project::load_yaml(&root.join("01_single_channel.yaml"))
        .unwrap_or_else(|e| panic!("Failed to load single channel demo: {e}"));
    fd_project::compile_options(&channel).unwrap();
    fd_project::compile_channel(&channel).unwrap();

    let diamond = fd_project::load_yaml(&root.join("02_diamond_network.yaml"))
        .unwrap_or_else(|e| panic!("Failed to load diamond demo: {e}"));
    let compiled = fd_project::compile_network(&diamond).unwrap();
    assert_eq!(compiled.graph.nodes().len(), 4);
    assert_eq!(compiled.graph.edges().len(), 4);
    assert_eq!(compiled.graph.sources(), &[compiled.node_ids["inlet"]]);
    assert_eq!(compiled.graph.targets(), &[compiled.node_ids["outlet"]]);
}

#[test]
fn diamond_demo_runs() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/projects");
    let project = fd_project::load_yaml(&root.join("02_diamond_network.yaml")).unwrap();
    let options = fd_project::compile_options(&project).unwrap();
    let network = fd_project::compile_network(&project).unwrap();

    let run = fd_sim::NetworkEngine::new(network.graph, options)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(run.t.len(), 6);
    assert_eq!(run.records.len(), 5);
}
