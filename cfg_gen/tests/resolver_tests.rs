/* Resolver Tests
 *
 * Struct expansion, idempotence, cycle rejection and the basic type set.
 */

use cfg_gen::cfg_types::{Member, MemberKind, StructDef, VarDef};
use cfg_gen::resolve::Resolver;
use cfg_gen::{parse_definitions, resolve, Model, ModelBuilder, ResolveError};

fn resolve_source(source: &str) -> Result<Model, ResolveError> {
    let output = parse_definitions(source);
    assert!(output.diagnostics.is_empty(), "unexpected diagnostics: {:?}", output.diagnostics);
    resolve(output.builder)
}

fn nested<'a>(member: &'a Member) -> &'a [Member] {
    match &member.kind {
        MemberKind::Struct { members, .. } => members,
        MemberKind::Primitive { .. } => panic!("{} is not a struct member", member.name),
    }
}

const LINE_SOURCE: &str = "
struct Point {
    int x;
    int y;
};
struct Line {
    struct Point from;
    struct Point to;
};
struct Drawing {
    float scale;
    struct Line lines[2];
};
struct Drawing drawing;
struct Line segment;
";

#[test]
fn test_nested_structs_are_expanded_transitively() {
    let model = resolve_source(LINE_SOURCE).unwrap();

    let drawing = model.find_struct("Drawing").unwrap();
    let lines = &drawing.members[1];
    assert!(lines.is_expanded());

    let from = &nested(lines)[0];
    assert_eq!(from.name, "from");
    assert!(from.is_expanded());
    assert_eq!(
        nested(from),
        &[Member::primitive("int", "x"), Member::primitive("int", "y")]
    );
}

#[test]
fn test_shared_struct_is_copied_into_each_parent() {
    let model = resolve_source(LINE_SOURCE).unwrap();

    let line = model.find_struct("Line").unwrap();
    assert_eq!(nested(&line.members[0]), nested(&line.members[1]));

    /* The copy inside Drawing is structurally identical to Line itself */
    let drawing = model.find_struct("Drawing").unwrap();
    assert_eq!(nested(&drawing.members[1]), line.members.as_slice());
}

#[test]
fn test_expansion_is_idempotent() {
    let model = resolve_source(LINE_SOURCE).unwrap();
    let structs = model.structs().to_vec();

    let resolver = Resolver::new(&structs);
    for def in &structs {
        assert_eq!(&resolver.expand_struct(def).unwrap(), def);
    }

    /* Resolving the resolved tables again changes nothing */
    let mut builder = ModelBuilder::new();
    for def in model.structs() {
        builder.add_struct(def.clone());
    }
    for var in model.vars() {
        builder.add_var(var.clone());
    }
    let again = resolve(builder).unwrap();
    assert_eq!(again.structs(), model.structs());
    assert_eq!(again.basic_types(), model.basic_types());
}

#[test]
fn test_unresolvable_reference_stays_empty() {
    let model = resolve_source(
        "
struct Holder {
    int id;
    struct Missing ghost;
};
struct Holder holder;
struct Nowhere lost;
",
    )
    .unwrap();

    let holder = model.find_struct("Holder").unwrap();
    assert!(!holder.members[1].is_expanded());
    assert!(nested(&holder.members[1]).is_empty());
    assert!(model.find_struct("Nowhere").is_none());
    assert_eq!(model.basic_types().iter().collect::<Vec<_>>(), vec!["int"]);
}

#[test]
fn test_self_reference_is_rejected() {
    let err = resolve_source(
        "
struct Node {
    int value;
    struct Node next;
};
",
    )
    .unwrap_err();
    assert_eq!(
        err,
        ResolveError::CircularReference { chain: vec!["Node".to_string(), "Node".to_string()] }
    );
}

#[test]
fn test_mutual_reference_is_rejected() {
    let err = resolve_source(
        "
struct A {
    struct B b;
};
struct B {
    int x;
    struct A a;
};
struct A root;
",
    )
    .unwrap_err();
    assert_eq!(
        err,
        ResolveError::CircularReference {
            chain: vec!["A".to_string(), "B".to_string(), "A".to_string()]
        }
    );
    assert_eq!(err.to_string(), "circular struct reference: A -> B -> A");
}

#[test]
fn test_basic_types_in_first_seen_order() {
    let model = resolve_source(
        "
struct Inner {
    float gain;
    int id;
};
struct Outer {
    int count;
    struct Inner inner;
    char tag;
};
struct Outer outer;
int total;
",
    )
    .unwrap();
    assert_eq!(
        model.basic_types().iter().collect::<Vec<_>>(),
        vec!["int", "float", "char"]
    );
}

#[test]
fn test_primitive_variables_contribute_basic_types() {
    let model = resolve_source("double ratio;\nint count = 1;\ndouble other;\n").unwrap();
    assert_eq!(
        model.basic_types().iter().collect::<Vec<_>>(),
        vec!["double", "int"]
    );
}

#[test]
fn test_first_struct_definition_wins() {
    let mut builder = ModelBuilder::new();
    builder.add_struct(StructDef { name: "P".to_string(), members: vec![Member::primitive("int", "x")] });
    builder.add_struct(StructDef { name: "P".to_string(), members: vec![Member::primitive("double", "z")] });
    builder.add_var(VarDef::structure("P", "p"));

    let model = resolve(builder).unwrap();
    assert_eq!(model.structs().len(), 2);
    assert_eq!(model.find_struct("P").unwrap().members, vec![Member::primitive("int", "x")]);
    assert_eq!(model.basic_types().iter().collect::<Vec<_>>(), vec!["int"]);
}
