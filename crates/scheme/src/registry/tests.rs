use pretty_assertions::assert_eq;

use super::*;

fn registry_with(names: &[&str]) -> SchemeRegistry {
	let mut registry = SchemeRegistry::new();
	for name in names {
		registry.register(name).unwrap();
	}
	registry
}

#[test]
fn register_assigns_dense_ids() {
	let registry = registry_with(&["c", "cpp", "asm"]);
	assert_eq!(registry.len(), 3);
	assert_eq!(registry.lookup("cpp"), Some(SchemeId(1)));
	assert_eq!(registry.name(SchemeId(2)), Some("asm"));
	assert_eq!(registry.iter().map(|(_, name)| name).collect::<Vec<_>>(), vec!["c", "cpp", "asm"]);
}

#[test]
fn duplicate_name_is_rejected() {
	let mut registry = registry_with(&["c"]);
	assert_eq!(registry.register("c"), Err(SchemeError::Duplicate("c".into())));
	assert_eq!(registry.len(), 1);
}

#[test]
fn declare_virtual_keeps_declaration_order() {
	let mut registry = registry_with(&["html", "script", "js", "css", "style"]);
	let html = registry.lookup("html").unwrap();
	registry.declare_virtual(html, "script", Some("js")).unwrap();
	registry.declare_virtual(html, "style", Some("css")).unwrap();
	registry.declare_virtual(html, "css", None).unwrap();

	let entries = registry.virtual_entries(html).unwrap();
	assert_eq!(
		&entries[..],
		&[
			VirtualEntry::new(SchemeId(1), Some(SchemeId(2))),
			VirtualEntry::new(SchemeId(4), Some(SchemeId(3))),
			VirtualEntry::new(SchemeId(3), None),
		]
	);
}

#[test]
fn declare_virtual_rejects_unknown_names() {
	let mut registry = registry_with(&["html", "script"]);
	let html = registry.lookup("html").unwrap();
	assert_eq!(
		registry.declare_virtual(html, "script", Some("vbscript")),
		Err(SchemeError::Unknown("vbscript".into()))
	);
	assert_eq!(
		registry.declare_virtual(SchemeId(9), "script", None),
		Err(SchemeError::StaleId(SchemeId(9)))
	);
	assert!(registry.virtual_entries(html).unwrap().is_empty());
}

#[test]
fn schemes_without_declarations_have_empty_entries() {
	let registry = registry_with(&["plain"]);
	assert!(registry.virtual_entries(SchemeId(0)).unwrap().is_empty());
	assert!(registry.virtual_entries(SchemeId(1)).is_none());
}
