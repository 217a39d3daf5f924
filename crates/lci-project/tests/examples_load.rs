use std::path::Path;

#[test]
fn demo_projects_load_and_validate() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/projects");
    let demos = ["fuel_station.yaml"];

    for name in demos {
        let path = root.join(name);
        let project = lci_project::load_yaml(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        lci_project::validate_project(&project)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
        assert!(!project.plan.targets.is_empty(), "{} has no targets", name);
    }
}
