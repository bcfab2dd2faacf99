//! Resolving full request URLs: the path is taken from a parsed `url::Url`
use radix_mux::Tree;
use url::Url;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut tree = Tree::new();
    tree.insert("/", "GET", "Home page")?;
    tree.insert("/blog", "GET", "Blog index")?;
    tree.insert("/blog/:slug", "GET", "Blog post")?;
    tree.insert("/blog/:slug", "DELETE", "Delete post")?;
    tree.insert("/assets/*file", "GET", "Asset")?;

    let requests = [
        ("GET", "https://example.com/"),
        ("GET", "https://example.com/blog?page=2"),
        ("GET", "https://example.com/blog/first%20post"),
        ("DELETE", "https://example.com/blog/first-post"),
        ("GET", "https://example.com/assets/js/app.js"),
        ("PUT", "https://example.com/blog/first-post"),
    ];

    for (method, raw) in requests.iter() {
        let url = Url::parse(raw)?;
        match tree.find(url.path()) {
            Some(found) => match found.node.handler(method) {
                Some(page) => println!("{} {} -> {} {:?}", method, url.path(), page, found.params),
                None => println!(
                    "{} {} -> method not allowed, allowed: {:?}",
                    method,
                    url.path(),
                    found.node.methods()
                ),
            },
            None => println!("{} {} -> not found", method, url.path()),
        }
    }

    Ok(())
}
