//! Drives the cache and the substitution stack the way a line parser does:
//! each `begin NAME` line opens a scheme invocation, each `end` line closes
//! the innermost one.

use hue_parse_cache::{CacheError, DocumentCache, NodeId, ParseCacheCfg};
use hue_scheme::{SchemeId, SchemeRegistry};

const DOCUMENT: &[&str] = &[
	"begin html",   // 0
	"<p>",          // 1
	"begin script", // 2
	"let x = 1;",   // 3
	"end",          // 4
	"begin php",    // 5
	"begin script", // 6
	"echo $x;",     // 7
	"end",          // 8
	"end",          // 9
	"end",          // 10
];

struct Open {
	node: NodeId,
	pushed: bool,
	substituted: bool,
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

fn registry() -> SchemeRegistry {
	let mut registry = SchemeRegistry::new();
	for name in ["html", "php", "script", "js", "php-js"] {
		registry.register(name).unwrap();
	}
	let html = registry.lookup("html").unwrap();
	let php = registry.lookup("php").unwrap();
	registry.declare_virtual(html, "script", Some("js")).unwrap();
	registry.declare_virtual(php, "script", Some("php-js")).unwrap();
	registry
}

fn scheme(registry: &SchemeRegistry, name: &str) -> SchemeId {
	registry.lookup(name).unwrap()
}

/// Parses the whole document, keeping each substitution active for the
/// lifetime of the invocation it selected.
fn parse(doc: &mut DocumentCache<()>, registry: &SchemeRegistry, lines: &[&str]) -> Result<(), CacheError> {
	let mut stack = doc.new_stack();
	let mut open: Vec<Open> = Vec::new();

	for (line, text) in lines.iter().enumerate() {
		let line = line as u32;
		if let Some(name) = text.strip_prefix("begin ") {
			let resolution = stack.resolve(scheme(registry, name));
			let parent = open.last().map(|open| open.node);
			let node = doc.record(parent, resolution.scheme, (line, u32::MAX), &stack, None)?;
			let pushed = stack.push(registry.virtual_entries(resolution.scheme));
			open.push(Open {
				node,
				pushed,
				substituted: resolution.is_substituted(),
			});
		} else if *text == "end" {
			let closing = open.pop().expect("balanced document");
			doc.tree_mut().set_end_line(closing.node, line)?;
			if closing.pushed {
				stack.pop()?;
			}
			if closing.substituted {
				stack.unresolve()?;
			}
		}
	}

	assert!(open.is_empty());
	assert!(stack.is_empty());
	Ok(())
}

#[test]
fn full_parse_caches_substituted_schemes() {
	init_tracing();
	let registry = registry();
	let mut doc = DocumentCache::new(ParseCacheCfg::default());
	parse(&mut doc, &registry, DOCUMENT).unwrap();

	let tree = doc.tree();
	tree.verify().unwrap();
	assert_eq!(tree.len(), 4);
	assert_eq!(tree.scheme_at(1), Some(scheme(&registry, "html")));
	assert_eq!(tree.scheme_at(3), Some(scheme(&registry, "js")));
	assert_eq!(tree.scheme_at(5), Some(scheme(&registry, "php")));
	assert_eq!(tree.scheme_at(7), Some(scheme(&registry, "php-js")));
	assert_eq!(tree.scheme_at(11), None);
}

#[test]
fn resume_reattaches_the_context_of_the_cached_invocation() {
	init_tracing();
	let registry = registry();
	let mut doc = DocumentCache::new(ParseCacheCfg::default());
	parse(&mut doc, &registry, DOCUMENT).unwrap();

	// Inside php-js the php frame is hidden by the substitution that selected
	// it, so only the html frame was recorded.
	let mut resumed = doc.resume(7);
	let node = resumed.lookup.node.unwrap();
	assert_eq!(doc.tree().get(node).unwrap().scheme(), scheme(&registry, "php-js"));
	assert_eq!(resumed.stack.depth(), 1);
	assert_eq!(resumed.stack.top_entries(), registry.virtual_entries(scheme(&registry, "html")));
	assert_eq!(resumed.stack.resolve(scheme(&registry, "script")).scheme, scheme(&registry, "js"));
	resumed.stack.unresolve().unwrap();

	let resumed = doc.resume(5);
	assert_eq!(resumed.stack.depth(), 1);
	let ancestors: Vec<_> = doc.tree().ancestors(resumed.lookup.node.unwrap()).collect();
	assert_eq!(ancestors.len(), 1);
}

#[test]
fn edits_invalidate_from_the_changed_line() {
	init_tracing();
	let registry = registry();
	let mut doc = DocumentCache::new(ParseCacheCfg {
		verify_invariants: true,
		..ParseCacheCfg::default()
	});
	parse(&mut doc, &registry, DOCUMENT).unwrap();

	assert_eq!(doc.edit(7), Ok(0));
	assert_eq!(doc.tree().scheme_at(6), Some(scheme(&registry, "php-js")));
	assert_eq!(doc.tree().scheme_at(7), None);

	assert_eq!(doc.edit(5), Ok(2));
	assert_eq!(doc.tree().len(), 2);
	assert_eq!(doc.tree().scheme_at(3), Some(scheme(&registry, "js")));
	assert_eq!(doc.tree().scheme_at(4), Some(scheme(&registry, "js")));
	assert_eq!(doc.tree().find(5).prior, doc.tree().roots().next());

	doc.clear();
	parse(&mut doc, &registry, DOCUMENT).unwrap();
	assert_eq!(doc.tree().len(), 4);
}
