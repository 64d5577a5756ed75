/* Fixed C runtime emitted into every generated source file.
 *
 * The generated readers only rely on the names defined here:
 * `struct config_region`, `parse_regions`, `release_regions` and the
 * limits `NUM_REGIONS_MAX` and friends. */

use super::walk::{Emitter, Walker};
use crate::diagnostics::Diagnostic;
use crate::model::Model;
use cfg_types::VarDef;

/// Buffer sizes of the region parser. Each one is at least its default and
/// grows to fit everything `<base>_write` can put in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionLimits {
  pub lines_per_region: usize,
  pub line_size: usize,
  pub regions: usize,
  pub name_size: usize,
}

impl Default for RegionLimits {
  fn default() -> Self {
    Self { lines_per_region: 128, line_size: 512, regions: 16, name_size: 32 }
  }
}

/* Room for ` = `, the printed value and `;` after the path */
const VALUE_ROOM: usize = 64;

impl RegionLimits {
  pub fn for_model(model: &Model) -> Self {
    let mut counter = LeafCounter::default();
    let _ = Walker::new(model).walk_variables(&mut counter);

    let defaults = Self::default();
    let longest_name = model.vars().iter().map(|v| v.name.len()).max().unwrap_or(0);
    Self {
      lines_per_region: defaults.lines_per_region.max(counter.max_leaves),
      line_size: defaults.line_size.max(counter.longest_path + VALUE_ROOM),
      regions: defaults.regions.max(model.vars().len()),
      /* `CONF_` plus the terminating NUL */
      name_size: defaults.name_size.max(longest_name + 6),
    }
  }
}

#[derive(Default)]
struct LeafCounter {
  leaves: usize,
  max_leaves: usize,
  longest_path: usize,
}

impl Emitter for LeafCounter {
  fn begin_variable(&mut self, _var: &VarDef) {
    self.leaves = 0;
  }

  fn end_variable(&mut self, _var: &VarDef) {
    self.max_leaves = self.max_leaves.max(self.leaves);
  }

  fn leaf(&mut self, path: &str, _type_name: &str, _diagnostics: &mut Vec<Diagnostic>) {
    self.leaves += 1;
    self.longest_path = self.longest_path.max(path.len());
  }
}

/// Limits and the region record, placed ahead of the parse helpers.
pub fn prelude(limits: RegionLimits) -> String {
  format!(
    r#"
#define REGION_NBUFF_MAX {}
#define READ_BUFF_SIZE {}
#define NUM_REGIONS_MAX {}
#define REGION_NAME_SIZE {}

struct config_region {{
	char name[REGION_NAME_SIZE];
	char *buffs[REGION_NBUFF_MAX];
	int nbuffs;
}};

"#,
    limits.lines_per_region, limits.line_size, limits.regions, limits.name_size
  )
}

/// Prefix of every local and parameter in the generated functions.
pub const LOCAL_PREFIX: &str = "cfg_";

/// File-scope identifiers defined by the prelude and the library.
pub const RUNTIME_NAMES: &[&str] = &[
  "REGION_NBUFF_MAX",
  "READ_BUFF_SIZE",
  "NUM_REGIONS_MAX",
  "REGION_NAME_SIZE",
  "config_region",
  "remove_space",
  "conf_readline",
  "load_region",
  "parse_regions",
  "release_regions",
];

/// Line reader, region loader and releaser.
pub const LIBRARY: &str = r#"
static void remove_space(char *str)
{
	int i;
	int j = 0;

	for (i = 0; str[i] != 0; i++) {
		if (str[i] != ' ' && str[i] != '\t' && str[i] != '\n' && str[i] != '\r') {
			str[j++] = str[i];
		}
	}
	str[j] = 0;
}

/* Returns the line length plus one, 0 at end of file, -1 on error */
static int conf_readline(FILE *file, char *line, int size)
{
	int c;
	int len = 0;

	while ((c = fgetc(file)) != EOF) {
		if (c == '\n') {
			break;
		}
		if (len >= size - 1) {
			printf("%s:too long line\n", __func__);
			line[len] = 0;
			return -1;
		}
		line[len++] = (char)c;
	}
	line[len] = 0;

	if (c == EOF && len == 0) {
		return 0;
	}

	return len + 1;
}

static int load_region(struct config_region *region, const char *name,
		       FILE *file, char *line, int size)
{
	bool end_region = false;
	size_t name_len = strlen(name);
	int i;

	if (name_len >= REGION_NAME_SIZE) {
		printf("%s:name region too long: %s\n", __func__, name);
		return -1;
	}
	memset(region->name, 0, REGION_NAME_SIZE);
	memcpy(region->name, name, name_len);
	region->nbuffs = 0;

	while (conf_readline(file, line, size) > 0) {
		remove_space(line);
		if (line[0] == '#' || line[0] == 0) {
			continue;
		}
		if (strncmp(line, "};", 2) == 0) {
			end_region = true;
			break;
		}
		if (region->nbuffs >= REGION_NBUFF_MAX) {
			printf("%s:too many lines in region: %s\n", __func__, region->name);
			continue;
		}
		region->buffs[region->nbuffs] = malloc(strlen(line) + 1);
		if (region->buffs[region->nbuffs] == NULL) {
			printf("%s:unable to malloc\n", __func__);
			break;
		}
		strcpy(region->buffs[region->nbuffs], line);
		region->nbuffs++;
	}

	if (!end_region) {
		printf("%s:Missing '};' region: %s\n", __func__, region->name);
		for (i = 0; i < region->nbuffs; i++) {
			free(region->buffs[i]);
			region->buffs[i] = NULL;
		}
		region->nbuffs = 0;
		return -1;
	}

	return 0;
}

static int parse_regions(FILE *file, struct config_region *regions, int max_regions)
{
	char line[READ_BUFF_SIZE];
	char name[READ_BUFF_SIZE];
	int nregions = 0;
	char *brace;

	while (nregions < max_regions && conf_readline(file, line, sizeof(line)) > 0) {
		remove_space(line);
		if (line[0] == '#' || strncmp(line, "CONF_", 5) != 0) {
			continue;
		}
		brace = strstr(line, "={");
		if (brace == NULL) {
			continue;
		}
		*brace = 0;
		strcpy(name, line);

		if (load_region(&regions[nregions], name, file, line, sizeof(line)) == 0) {
			nregions++;
		} else {
			printf("%s:Unable to load region: %s\n", __func__, name);
		}
	}

	return nregions;
}

static void release_regions(struct config_region *regions, int nregions)
{
	int i;
	int j;

	for (i = 0; i < nregions; i++) {
		for (j = 0; j < regions[i].nbuffs; j++) {
			free(regions[i].buffs[j]);
			regions[i].buffs[j] = NULL;
		}
		regions[i].nbuffs = 0;
	}
}

"#;

/// `read_<type>`: find `tag=value;` among a region's lines and convert it.
pub fn parse_helper(type_name: &str, converter: &str) -> String {
  let mut out = format!(
    "static int read_{}({} *var, const char *tag, char **buffs, int nbuffs)\n",
    type_name, type_name
  );
  out.push_str(
    r#"{
	size_t tag_len = strlen(tag);
	int i;

	for (i = 0; i < nbuffs; i++) {
		char *value;
		char *end;

		if (buffs[i] == NULL || strncmp(buffs[i], tag, tag_len) != 0 || buffs[i][tag_len] != '=') {
			continue;
		}
		value = buffs[i] + tag_len + 1;
		end = strchr(value, ';');
		if (end == NULL) {
			printf("%s:Missing ';': %s\n", __func__, buffs[i]);
			return -1;
		}
		*end = 0;
"#,
  );
  out.push_str(&format!("\t\t*var = ({}){}(value);\n", type_name, converter));
  out.push_str(
    r#"		return 0;
	}

	return -1;
}

"#,
  );
  out
}
