use serde_derive::{Deserialize, Serialize};

/// `#define NAME VALUE`. Only consulted for array sizes.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Macro {
    pub name: String,
    pub value: String,
}

impl Macro {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub enum MemberKind {
    Primitive {
        type_name: String,
    },
    /// A nested struct, referenced by name. `members` stays empty until the
    /// reference is expanded into an owned copy of the target's members.
    Struct {
        struct_name: String,
        #[serde(default)]
        members: Vec<Member>,
    },
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    /// Raw size token, either a numeral or a macro name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_size: Option<String>,
}

impl Member {
    pub fn primitive(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Primitive {
                type_name: type_name.into(),
            },
            array_size: None,
        }
    }

    pub fn structure(struct_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Struct {
                struct_name: struct_name.into(),
                members: Vec::new(),
            },
            array_size: None,
        }
    }

    pub fn with_array_size(mut self, size: impl Into<String>) -> Self {
        self.array_size = Some(size.into());
        self
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, MemberKind::Struct { .. })
    }

    /* True for a struct-typed member whose reference has been materialized */
    pub fn is_expanded(&self) -> bool {
        match &self.kind {
            MemberKind::Struct { members, .. } => !members.is_empty(),
            MemberKind::Primitive { .. } => false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct StructDef {
    pub name: String,
    pub members: Vec<Member>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub enum VarKind {
    Primitive {
        type_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_value: Option<String>,
    },
    Struct {
        struct_name: String,
    },
}

/// A top-level global variable.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct VarDef {
    pub name: String,
    pub kind: VarKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_size: Option<String>,
}

impl VarDef {
    pub fn primitive(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Primitive {
                type_name: type_name.into(),
                initial_value: None,
            },
            array_size: None,
        }
    }

    pub fn structure(struct_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Struct {
                struct_name: struct_name.into(),
            },
            array_size: None,
        }
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        if let VarKind::Primitive { initial_value, .. } = &mut self.kind {
            *initial_value = Some(value.into());
        }
        self
    }

    pub fn with_array_size(mut self, size: impl Into<String>) -> Self {
        self.array_size = Some(size.into());
        self
    }

    /// C spelling of the declared type, e.g. `int` or `struct Point`.
    pub fn c_type(&self) -> String {
        match &self.kind {
            VarKind::Primitive { type_name, .. } => type_name.clone(),
            VarKind::Struct { struct_name } => format!("struct {}", struct_name),
        }
    }
}
