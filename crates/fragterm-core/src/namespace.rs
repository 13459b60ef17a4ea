use serde_json::{json, Map, Value};

/// An object tree that can be walked by property name.
pub trait Namespace {
    type Value;

    fn root(&self) -> &Self::Value;

    /// Property names of `value`; empty for leaves.
    fn keys(&self, value: &Self::Value) -> Vec<String>;

    fn get<'a>(&'a self, value: &'a Self::Value, key: &str) -> Option<&'a Self::Value>;
}

/// Execution namespace backed by a JSON object.
///
/// Layout of a context namespace:
///
/// ```text
/// cwd   - working directory runs start in
/// env   - process environment at context creation
/// vars  - user variables exported to every run
/// meta  - context name, options and fragment summary
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JsonNamespace {
    root: Value,
}

impl JsonNamespace {
    pub fn new(root: Value) -> Self {
        let root = if root.is_object() {
            root
        } else {
            Value::Object(Map::new())
        };
        Self { root }
    }

    /// Fresh namespace for a context.
    pub fn for_context(name: &str) -> Self {
        let env: Map<String, Value> = std::env::vars()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| ".".into());
        Self::new(json!({
            "cwd": cwd,
            "env": env,
            "vars": {},
            "meta": { "name": name },
        }))
    }

    pub fn value(&self) -> &Value {
        &self.root
    }

    /// Value at a dotted path.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .filter(|s| !s.is_empty())
            .try_fold(&self.root, |v, key| v.get(key))
    }

    /// Set a value at a dotted path, creating intermediate objects.
    pub fn set(&mut self, path: &str, value: Value) {
        let mut parts: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        let Some(last) = parts.pop() else {
            return;
        };
        let mut node = &mut self.root;
        for part in parts {
            if !node.get(part).is_some_and(Value::is_object) {
                node[part] = Value::Object(Map::new());
            }
            node = &mut node[part];
        }
        node[last] = value;
    }

    pub fn cwd(&self) -> Option<&str> {
        self.root.get("cwd").and_then(Value::as_str)
    }

    /// Scalar entries of `vars`, rendered as strings.
    pub fn vars(&self) -> Vec<(String, String)> {
        let Some(Value::Object(vars)) = self.root.get("vars") else {
            return Vec::new();
        };
        vars.iter()
            .filter_map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((k.clone(), text))
            })
            .collect()
    }
}

impl Default for JsonNamespace {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl Namespace for JsonNamespace {
    type Value = Value;

    fn root(&self) -> &Value {
        &self.root
    }

    fn keys(&self, value: &Value) -> Vec<String> {
        match value {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn get<'a>(&'a self, value: &'a Value, key: &str) -> Option<&'a Value> {
        match value {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }
}
