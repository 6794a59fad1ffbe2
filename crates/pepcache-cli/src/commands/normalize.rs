use crate::cli::NormalizeArgs;
use pepcache::core::notation;

pub fn run(args: NormalizeArgs) {
    for raw in &args.notations {
        println!("{}", describe(raw));
    }
}

fn describe(raw: &str) -> String {
    let change = notation::normalize(raw);
    if change.is_synonymous {
        "synonymous".to_string()
    } else {
        change.notation
    }
}
