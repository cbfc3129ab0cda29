//! `json-patch-ot`: three-way merge of JSON documents.
//!
//! Usage:
//!   json-patch-ot '<base-json>' '<left-json>' '<right-json>'
//!
//! Both edited documents are diffed against the base; the left edit is
//! applied first and the right edit is transformed against it. The merged
//! document is written to stdout.

use jsonpatch_ot::cli::merge;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: json-patch-ot <base-json> <left-json> <right-json>");
        std::process::exit(1);
    }

    match merge(&args[1], &args[2], &args[3]) {
        Ok(result) => println!("{result}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
