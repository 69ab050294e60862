use acorn::component::port::{ComponentRepoError, ComponentRepository, ComponentSource};
use pretty_assertions::assert_eq;
use test_common::{
    TEST_COMPONENT, TempDir, create_component_file, create_invalid_component_file,
    create_test_component_file, create_test_repository,
};

#[test]
fn test_builtins_are_listed_without_override_dir() {
    let temp_dir = TempDir::new().unwrap();
    let repo = acorn::component::repository::yaml::YamlComponentRepository::new(
        acorn::fs::RealFileSystem,
        temp_dir.path().join("missing"),
    );

    let names = repo.list_components().unwrap();

    assert_eq!(names, acorn::component::builtin::names());
    assert!(names.contains(&"node".to_string()));
}

#[test]
fn test_user_only_component_is_listed_and_loaded() {
    let temp_dir = TempDir::new().unwrap();
    create_test_component_file(&temp_dir);
    let repo = create_test_repository(&temp_dir);

    assert!(repo.list_components().unwrap().contains(&TEST_COMPONENT.to_string()));
    assert_eq!(repo.source_of(TEST_COMPONENT), Some(ComponentSource::Override));

    let component = repo.get_component(TEST_COMPONENT).unwrap();
    assert_eq!(component.name(), TEST_COMPONENT);
    assert_eq!(component.tools().len(), 2);
    assert!(component.has_shell_integration());
}

#[test]
fn test_override_merges_with_builtin() {
    let temp_dir = TempDir::new().unwrap();
    create_component_file(
        &temp_dir,
        "node",
        "aliases:\n  ni: pnpm install\nenv:\n  NODE_OPTIONS: --max-old-space-size=4096\n",
    );
    let repo = create_test_repository(&temp_dir);

    let component = repo.get_component("node").unwrap();

    assert_eq!(repo.source_of("node"), Some(ComponentSource::Both));
    assert_eq!(component.aliases()["ni"], "pnpm install");
    assert_eq!(component.env()["NODE_OPTIONS"], "--max-old-space-size=4096");
    assert!(component.tool("npm").is_some());
}

#[test]
fn test_invalid_override_reports_its_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_invalid_component_file(&temp_dir, "broken");
    let repo = create_test_repository(&temp_dir);

    let err = repo.get_component("broken").unwrap_err();

    match err {
        ComponentRepoError::ParseError { name, source } => {
            assert_eq!(name, "broken");
            assert_eq!(source.component_path(), path);
        }
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_create_user_override_copies_builtin() {
    let temp_dir = TempDir::new().unwrap();
    let override_dir = temp_dir.path().join("nested").join("components");
    let repo = acorn::component::repository::yaml::YamlComponentRepository::new(
        acorn::fs::RealFileSystem,
        override_dir.clone(),
    );

    let path = repo.create_user_override("golang").unwrap();

    assert_eq!(path, override_dir.join("golang.yaml"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        repo.embedded_yaml("golang").unwrap()
    );
    assert!(repo.has_user_override("golang"));
    assert_eq!(repo.get_component("golang").unwrap().name(), "golang");
}

#[test]
fn test_unknown_component_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let repo = create_test_repository(&temp_dir);

    assert!(matches!(
        repo.get_component("does-not-exist"),
        Err(ComponentRepoError::ComponentNotFound { .. })
    ));
    assert!(matches!(
        repo.create_user_override("does-not-exist"),
        Err(ComponentRepoError::NoEmbeddedDefault { .. })
    ));
}
