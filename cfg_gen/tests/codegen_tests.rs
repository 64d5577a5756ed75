/* Code Generation Tests
 *
 * These tests verify the header, source and template emitters against the
 * shared traversal rules: qualified paths, array unrolling and local
 * failure on bad array sizes.
 */

use cfg_gen::codegen::c::{CCodeGenerator, CCodeGeneratorOptions, GeneratedCode};
use cfg_gen::codegen::read::emit_read_functions;
use cfg_gen::codegen::template::{emit_template, TemplateOptions};
use cfg_gen::codegen::write::emit_write_functions;
use cfg_gen::{parse_definitions, resolve, Diagnostic, Model};

fn model_from(source: &str) -> Model {
    resolve(parse_definitions(source).builder).expect("model resolves")
}

fn generate(source: &str, header_file: &str) -> GeneratedCode {
    let model = model_from(source);
    let options = CCodeGeneratorOptions { header_file: header_file.to_string(), ..Default::default() };
    CCodeGenerator::new(&model, options).emit_code()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

const POINT_SOURCE: &str = "
struct Point {
    int x;
    int y;
};
struct Point origin;
";

#[test]
fn test_point_header() {
    let code = generate(POINT_SOURCE, "point.h");

    assert!(code.header.contains("#ifndef POINT_H\n#define POINT_H\n"));
    assert!(code.header.trim_end().ends_with("#endif /* POINT_H */"));
    assert!(code.header.contains("struct Point {\n\tint x;\n\tint y;\n};\n"));
    assert!(code.header.contains("extern struct Point origin;\n"));
    assert!(code.header.contains("int point_read(const char* file_name);"));
    assert!(code.header.contains("int point_write(const char* file_name);"));
    assert!(code.diagnostics.is_empty());
}

#[test]
fn test_point_template() {
    let code = generate(POINT_SOURCE, "point.h");
    assert_eq!(
        code.template,
        "CONF_origin = {\n\torigin.x = <value>;\n\torigin.y = <value>;\n};\n\n"
    );
}

#[test]
fn test_point_read_and_write_touch_each_field_once() {
    let code = generate(POINT_SOURCE, "point.h");

    assert!(code.source.contains(
        "static int read_origin(char **cfg_buffs, int cfg_nbuffs)\n{\n\
         \tread_int(&origin.x, \"origin.x\", cfg_buffs, cfg_nbuffs);\n\
         \tread_int(&origin.y, \"origin.y\", cfg_buffs, cfg_nbuffs);\n\
         \n\treturn 0;\n}\n"
    ));
    assert!(code.source.contains(
        "static int config_write_origin(FILE *cfg_file)\n{\n\
         \tfprintf(cfg_file, \"CONF_origin = {\\n\");\n\
         \tfprintf(cfg_file, \"\\torigin.x = %d;\\n\", origin.x);\n\
         \tfprintf(cfg_file, \"\\torigin.y = %d;\\n\", origin.y);\n\
         \tfprintf(cfg_file, \"};\\n\\n\");\n"
    ));
    assert_eq!(count(&code.source, "read_int(&origin."), 2);
    assert_eq!(count(&code.source, "fprintf(cfg_file, \"\\torigin."), 2);

    assert!(code.source.contains("#include \"point.h\"\n"));
    assert!(code.source.contains("struct Point origin;\n"));
    assert!(code.source.contains("int point_read(const char* cfg_file_name)\n{"));
    assert!(code.source.contains("if (strcmp(cfg_regions[cfg_i].name, \"CONF_origin\") == 0) {"));
    assert!(code.source.contains("memset(&origin, 0, sizeof(origin));"));
    assert!(code.source.contains("int point_write(const char* cfg_file_name)\n{"));
    assert!(code.source.contains("\tconfig_write_origin(cfg_file);\n"));
}

#[test]
fn test_macro_sized_array_unrolls_in_every_emitter() {
    let source = "
#define SIZE 4
struct Buffer {
    int data[SIZE];
};
struct Buffer buffer;
";
    let model = model_from(source);

    let template = emit_template(&model, TemplateOptions::default());
    let read = emit_read_functions(&model, "buffer");
    let write = emit_write_functions(&model, "buffer");

    for index in 0..4 {
        let path = format!("buffer.data[{}]", index);
        assert_eq!(count(&template.text, &format!("\t{} = <value>;", path)), 1);
        assert_eq!(count(&read.text, &format!("read_int(&{}, \"{}\"", path, path)), 1);
        assert_eq!(count(&write.text, &format!("\\t{} = %d;\\n\", {});", path, path)), 1);
    }
    assert_eq!(count(&template.text, "<value>"), 4);
    assert_eq!(count(&read.text, "read_int(&"), 4);
    assert!(!template.text.contains("buffer.data[4]"));
    assert!(template.diagnostics.is_empty() && read.diagnostics.is_empty() && write.diagnostics.is_empty());

    /* The header keeps the macro name for the C compiler */
    let header = CCodeGenerator::new(&model, CCodeGeneratorOptions::default()).emit_header();
    assert!(header.contains("#define SIZE 4\n"));
    assert!(header.contains("\tint data[SIZE];\n"));
}

#[test]
fn test_undefined_macro_yields_no_leaves_and_one_diagnostic() {
    let source = "
struct Buffer {
    int head;
    int data[UNKNOWN];
};
struct Buffer buffer;
";
    let model = model_from(source);
    let expected = Diagnostic::InvalidArraySize {
        path: "buffer.data".to_string(),
        token: "UNKNOWN".to_string(),
        reason: "macro `UNKNOWN` is not defined".to_string(),
    };

    let template = emit_template(&model, TemplateOptions::default());
    assert_eq!(template.text, "CONF_buffer = {\n\tbuffer.head = <value>;\n};\n\n");
    assert_eq!(template.diagnostics, vec![expected.clone()]);

    let read = emit_read_functions(&model, "buffer");
    assert!(!read.text.contains("buffer.data"));
    assert_eq!(read.diagnostics, vec![expected.clone()]);

    let write = emit_write_functions(&model, "buffer");
    assert!(!write.text.contains("buffer.data"));
    assert_eq!(write.diagnostics, vec![expected.clone()]);

    /* The combined run reports it once */
    let code = generate(source, "buffer.h");
    assert_eq!(code.diagnostics, vec![expected]);
}

#[test]
fn test_struct_array_paths() {
    let source = "
struct Point {
    int x;
    int y;
};
struct Point table[3];
";
    let code = generate(source, "table.h");
    assert!(code.header.contains("extern struct Point table[3];\n"));
    assert!(code.source.contains("\nstruct Point table[3];\n"));
    assert!(code.template.contains("\ttable[2].y = <value>;\n"));
    assert_eq!(count(&code.template, "<value>"), 6);
    assert!(code.source.contains("read_int(&table[1].x, \"table[1].x\", cfg_buffs, cfg_nbuffs);"));
    /* No in-use flag member, so elements are written unconditionally */
    assert!(!code.source.contains("isInUsed"));
}

#[test]
fn test_parse_helpers_follow_basic_types() {
    let source = "
struct Sample {
    int id;
    float level;
    char tag;
};
struct Sample sample;
";
    let model = model_from(source);
    assert_eq!(
        model.basic_types().iter().collect::<Vec<_>>(),
        vec!["int", "float", "char"]
    );

    let code = generate(source, "sample.h");
    assert!(code.source.contains("static int read_int(int *var, const char *tag, char **buffs, int nbuffs)"));
    assert!(code.source.contains("*var = (int)atoi(value);"));
    assert!(code.source.contains("static int read_float(float *var, const char *tag, char **buffs, int nbuffs)"));
    assert!(code.source.contains("*var = (float)atof(value);"));
    assert!(!code.source.contains("static int read_char("));
    assert!(!code.source.contains("static int read_double("));

    /* char still gets a reader call and a format, plus a diagnostic */
    assert!(code.source.contains("read_char(&sample.tag, \"sample.tag\", cfg_buffs, cfg_nbuffs);"));
    assert!(code.source.contains("fprintf(cfg_file, \"\\tsample.tag = %c;\\n\", sample.tag);"));
    assert_eq!(
        code.diagnostics,
        vec![Diagnostic::UnsupportedPrimitive {
            path: "sample.tag".to_string(),
            type_name: "char".to_string(),
        }]
    );
}

#[test]
fn test_unknown_primitive_uses_unknown_format() {
    let code = generate("long ticks;\n", "ticks.h");
    assert!(code.source.contains("fprintf(cfg_file, \"\\tticks = unknown;\\n\", ticks);"));
    assert!(code.source.contains("read_long(&ticks, \"ticks\", cfg_buffs, cfg_nbuffs);"));
    assert_eq!(code.diagnostics.len(), 1);
}

#[test]
fn test_primitive_globals() {
    let source = "int count = 5;\ndouble ratio;\n";
    let code = generate(source, "globals.h");

    assert!(code.header.contains("extern int count;\n"));
    assert!(code.header.contains("extern double ratio;\n"));
    assert!(code.source.contains("\nint count = 5;\n"));
    assert!(code.source.contains("\ndouble ratio;\n"));

    assert_eq!(
        code.template,
        "CONF_count = {\n\tcount = <value>;\n};\n\nCONF_ratio = {\n\tratio = <value>;\n};\n\n"
    );
    assert!(code.source.contains("\tread_int(&count, \"count\", cfg_buffs, cfg_nbuffs);\n"));
    assert!(code.source.contains("\tfprintf(cfg_file, \"CONF_ratio = {\\n\");\n"));
    assert!(code.source.contains("\tfprintf(cfg_file, \"\\tratio = %lf;\\n\", ratio);\n"));
}

#[test]
fn test_in_use_flag_guards_array_elements() {
    let source = "
struct Slot {
    int isInUsed;
    int value;
};
struct Slot slots[2];
";
    let code = generate(source, "slots.h");
    assert!(code.source.contains(
        "\tif (slots[0].isInUsed != 0) {\n\
         \t\tfprintf(cfg_file, \"\\tslots[0].isInUsed = %d;\\n\", slots[0].isInUsed);\n\
         \t\tfprintf(cfg_file, \"\\tslots[0].value = %d;\\n\", slots[0].value);\n\
         \t}\n"
    ));
    assert_eq!(count(&code.source, ".isInUsed != 0) {"), 2);
}

#[test]
fn test_commented_template() {
    let model = model_from(POINT_SOURCE);
    let template = emit_template(&model, TemplateOptions { commented: true });
    assert_eq!(
        template.text,
        "#CONF_origin = {\n#\torigin.x = <value>;\n#\torigin.y = <value>;\n#};\n\n"
    );
}

#[test]
fn test_unresolved_struct_variable_is_an_empty_region() {
    let code = generate("struct Missing ghost;\n", "ghost.h");
    assert_eq!(code.template, "CONF_ghost = {\n};\n\n");
    assert!(code.source.contains("static int read_ghost(char **cfg_buffs, int cfg_nbuffs)\n{\n\n\treturn 0;\n}\n"));
    assert!(code.diagnostics.is_empty());
}

#[test]
fn test_malformed_struct_is_absent_from_every_output() {
    let source = "
struct Good {
    int a;
};
struct Good good;
struct Broken {
    int hidden_field;
";
    let parsed = parse_definitions(source);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(parsed.diagnostics[0].to_string().contains("Broken"));

    let model = resolve(parsed.builder).unwrap();
    let code = CCodeGenerator::new(&model, CCodeGeneratorOptions::default()).emit_code();
    for text in [&code.header, &code.source, &code.template] {
        assert!(!text.contains("Broken"));
        assert!(!text.contains("hidden_field"));
    }
    assert!(code.template.contains("\tgood.a = <value>;\n"));
}

#[test]
fn test_header_name_is_sanitized() {
    let code = generate(POINT_SOURCE, "out/my-config.h");
    assert!(code.header.contains("#ifndef MY_CONFIG_H\n"));
    assert!(code.header.contains("int my_config_read(const char* file_name);"));
    assert!(code.source.contains("#include \"my-config.h\"\n"));
}

#[test]
fn test_bundled_example_generates_cleanly() {
    let parsed = parse_definitions(include_str!("../demos/example.cfg"));
    assert!(parsed.diagnostics.is_empty());

    let model = resolve(parsed.builder).unwrap();
    assert_eq!(model.basic_types().iter().collect::<Vec<_>>(), vec!["double", "int", "float"]);

    let options = CCodeGeneratorOptions { header_file: "example.h".to_string(), ..Default::default() };
    let code = CCodeGenerator::new(&model, options).emit_code();
    assert!(code.diagnostics.is_empty());
    assert_eq!(count(&code.source, "if (station.sensors["), 4);
    assert!(code.template.contains("\tstation.sensors[3].limits.high = <value>;\n"));
    assert!(code.template.contains("\tstation.channels[1] = <value>;\n"));
    assert!(code.template.ends_with("CONF_log_level = {\n\tlog_level = <value>;\n};\n\n"));
}

#[test]
fn test_generated_locals_use_reserved_prefix() {
    let code = generate("int i;\nint file;\n", "names.h");
    assert!(code.source.contains("\tmemset(&i, 0, sizeof(i));\n"));
    assert!(code.source.contains("\tfprintf(cfg_file, \"\\tfile = %d;\\n\", file);\n"));
    assert!(code.source.contains("\tfor (cfg_i = 0; cfg_i < cfg_nregions; cfg_i++) {\n"));
    assert!(!code.source.contains("FILE *file;"));
    assert!(code.diagnostics.is_empty());
}

#[test]
fn test_names_clashing_with_generated_code() {
    let source = "int count;\nint read_count;\nint cfg_total;\nint parse_regions;\nint clashes_read;\nint i;\n";
    let code = generate(source, "clashes.h");
    let reserved = |name: &str| Diagnostic::ReservedName { name: name.to_string() };
    assert_eq!(
        code.diagnostics,
        vec![
            reserved("read_count"),
            reserved("cfg_total"),
            reserved("parse_regions"),
            reserved("clashes_read"),
        ]
    );
}

#[test]
fn test_region_limits_follow_the_model() {
    let defaults = generate(POINT_SOURCE, "point.h");
    assert!(defaults.source.contains(
        "#define REGION_NBUFF_MAX 128\n#define READ_BUFF_SIZE 512\n\
         #define NUM_REGIONS_MAX 16\n#define REGION_NAME_SIZE 32\n"
    ));

    let mut source = String::from("struct Samples {\n    int v[200];\n};\nstruct Samples samples;\n");
    for k in 0..20 {
        source.push_str(&format!("int g{};\n", k));
    }
    let long_name = "a_rather_long_variable_name_for_a_region_tag";
    source.push_str(&format!("int {};\n", long_name));

    let code = generate(&source, "large.h");
    assert!(code.source.contains("#define REGION_NBUFF_MAX 200\n"));
    assert!(code.source.contains("#define NUM_REGIONS_MAX 22\n"));
    assert!(code.source.contains(&format!("#define REGION_NAME_SIZE {}\n", long_name.len() + 6)));
    assert!(code.source.contains("#define READ_BUFF_SIZE 512\n"));
}

#[test]
fn test_duplicate_struct_is_declared_once() {
    let source = "
struct P {
    int first;
};
struct P {
    int second;
};
struct P p;
";
    let code = generate(source, "dup.h");
    assert_eq!(count(&code.header, "struct P {"), 1);
    assert!(code.header.contains("struct P {\n\tint first;\n};\n"));
    assert!(!code.header.contains("second"));
    assert!(code.template.contains("\tp.first = <value>;\n"));
}

#[test]
fn test_expression_macro_keeps_full_value() {
    let source = "
#define N (2 + 2) // four slots
struct Buffer {
    int data[N];
};
struct Buffer buffer;
";
    let code = generate(source, "expr.h");
    assert!(code.header.contains("#define N (2 + 2)\n"));
    assert_eq!(count(&code.template, "<value>"), 4);
    assert!(code.template.contains("\tbuffer.data[3] = <value>;\n"));
    assert!(code.diagnostics.is_empty());
}
