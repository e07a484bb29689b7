mod graph;
mod read;
mod update;

use rdf_memo_query::PatternTerm;

fn uri(value: &str) -> PatternTerm {
    PatternTerm::uri(value)
}

fn var(name: &str) -> PatternTerm {
    PatternTerm::variable(name)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}
