//! Building a route table and resolving a few paths
use radix_mux::{RouteError, Tree};

type Handler = fn(&radix_mux::Params) -> String;

fn show_user(params: &radix_mux::Params) -> String {
    format!("user {}", params["id"])
}

fn list_users(_: &radix_mux::Params) -> String {
    "all users".to_string()
}

fn serve_file(params: &radix_mux::Params) -> String {
    format!("file {}", params["path"])
}

fn main() -> Result<(), RouteError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut tree: Tree<Handler> = Tree::new();
    tree.insert("/users", "GET", list_users)?;
    tree.insert("/users/:id", "GET", show_user)?;
    tree.insert("/static/*path", "GET", serve_file)?;

    // Registration errors are ordinary values
    if let Err(err) = tree.insert("/users/:id", "GET", show_user) {
        println!("rejected: {}", err);
    }

    for path in &["/users", "/users/ada%20l", "/static/img/logo.png", "/nope"] {
        match tree.lookup(path, "GET") {
            Some((handler, params)) => println!("{} -> {}", path, handler(&params)),
            None => println!("{} -> no match", path),
        }
    }

    println!("\n{}", tree);
    Ok(())
}
