/* Primitive type table. Supporting another type is a new row here. */

pub struct Primitive {
  pub name: &'static str,
  /// printf conversion used by the write functions.
  pub format: &'static str,
  /// C function turning the stored text into a value. Types without one get
  /// no generated `read_<type>` helper.
  pub converter: Option<&'static str>,
}

pub const PRIMITIVES: &[Primitive] = &[
  Primitive { name: "int", format: "%d", converter: Some("atoi") },
  Primitive { name: "float", format: "%f", converter: Some("atof") },
  Primitive { name: "double", format: "%lf", converter: Some("atof") },
  Primitive { name: "char", format: "%c", converter: None },
];

pub const UNKNOWN_FORMAT: &str = "unknown";

pub fn lookup(name: &str) -> Option<&'static Primitive> {
  PRIMITIVES.iter().find(|p| p.name == name)
}

pub fn print_format(name: &str) -> &'static str {
  lookup(name).map_or(UNKNOWN_FORMAT, |p| p.format)
}

pub fn converter(name: &str) -> Option<&'static str> {
  lookup(name).and_then(|p| p.converter)
}
