use std::fmt::Debug;

macro_rules! find_one(
    ($x:ident, $y:ident, $t:ty) => (
        pub fn $x(&mut self, name: &str, d: $t) -> $t {
            let mut res = self.$y.iter_mut().find(|e| e.name == name);

            if let Some(e) = res.as_mut() {
                e.looked_up = true;
            }

            res.and_then(|e| e.values.get(0).cloned()).unwrap_or(d)
        }
    );
);

macro_rules! add(
    ($x:ident, $y:ident, $t:ty) => (
        pub fn $x<S: Into<String>>(&mut self, name: S, values: Vec<$t>) {
            let name = name.into();
            self.$y.retain(|e| e.name != name);
            self.$y.push(ParamSetItem::new(name, values));
        }
    );
);

/// Named, typed parameters used to configure samplers and renders.
#[derive(Default, Debug, Clone)]
pub struct ParamSet {
    bools: Vec<ParamSetItem<bool>>,
    ints: Vec<ParamSetItem<i32>>,
    floats: Vec<ParamSetItem<f32>>,
    strings: Vec<ParamSetItem<String>>,
}

impl ParamSet {
    add!(add_bool, bools, bool);
    add!(add_int, ints, i32);
    add!(add_float, floats, f32);
    add!(add_string, strings, String);

    find_one!(find_one_bool, bools, bool);
    find_one!(find_one_int, ints, i32);
    find_one!(find_one_float, floats, f32);
    find_one!(find_one_string, strings, String);

    /// Names of the parameters nobody asked for.
    pub fn unused(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_unused(&self.bools, &mut names);
        collect_unused(&self.ints, &mut names);
        collect_unused(&self.floats, &mut names);
        collect_unused(&self.strings, &mut names);
        names
    }

    pub fn report_unused(&self) {
        for name in self.unused() {
            warn!(slog_scope::logger(), "Parameter \"{}\" not used", name);
        }
    }
}

fn collect_unused<T: Debug>(items: &[ParamSetItem<T>], names: &mut Vec<String>) {
    names.extend(
        items
            .iter()
            .filter(|e| !e.looked_up)
            .map(|e| e.name.clone()),
    );
}

#[derive(Debug, Clone)]
struct ParamSetItem<T: Debug> {
    name: String,
    values: Vec<T>,
    looked_up: bool,
}

impl<T: Debug> ParamSetItem<T> {
    fn new(name: String, values: Vec<T>) -> ParamSetItem<T> {
        ParamSetItem {
            name,
            values,
            looked_up: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_find_one_default() {
        let mut ps = ParamSet::default();
        assert_eq!(ps.find_one_int("pixelsamples", 16), 16);
        assert_eq!(ps.find_one_string("name", "random".to_owned()), "random");
    }

    #[test]
    fn test_find_one_and_unused() {
        let mut ps = ParamSet::default();
        ps.add_int("pixelsamples", vec![4]);
        ps.add_float("unused", vec![1.0]);
        ps.add_bool("jitter", vec![true]);

        assert_eq!(ps.find_one_int("pixelsamples", 16), 4);
        assert!(ps.find_one_bool("jitter", false));
        assert_eq!(ps.unused(), vec!["unused".to_owned()]);
    }

    #[test]
    fn test_add_replaces() {
        let mut ps = ParamSet::default();
        ps.add_int("seed", vec![1]);
        ps.add_int("seed", vec![2]);
        assert_eq!(ps.find_one_int("seed", 0), 2);
    }
}
