use pathway::{Pattern, PatternError};

macro_rules! match_tests {
    ($($name:ident {
        pattern = $pattern:literal,
        $( $path:literal =>
            $( $(@$none:tt)? None )?
            $( $(@$some:tt)? { $( $key:literal => $val:expr ),* $(,)? } )?
        ),* $(,)?
    }),* $(,)?) => { $(
        #[test]
        fn $name() {
            let pattern = Pattern::compile($pattern).unwrap();

            $(match pattern.find($path) {
                None => {
                    $($( @$some )?
                        panic!("Expected '{}' to match '{}'", $path, $pattern)
                    )?
                }
                Some(values) => {
                    $($( @$some )?
                        let expected: Vec<(&str, Option<&str>)> = vec![$(($key, $val)),*];
                        let got = pattern
                            .keys()
                            .iter()
                            .map(String::as_str)
                            .zip(values)
                            .collect::<Vec<_>>();

                        assert_eq!(got, expected, "Wrong params for path '{}'", $path);
                    )?

                    $($( @$none )?
                        panic!(
                            "Unexpected match of '{}' against '{}', got: {:?}",
                            $path, $pattern, values
                        );
                    )?
                }
            })*
        }
   )* };
}

match_tests! {
    root {
        pattern = "/",
        "/" => {},
        "" => None,
        "/x" => None,
    },
    empty {
        pattern = "",
        "/" => {},
        "/about" => None,
    },
    literal {
        pattern = "/about",
        "/about" => {},
        "/ABOUT" => {},
        "/About/" => {},
        "/abou" => None,
        "/about/team" => None,
        "/aboutus" => None,
    },
    literal_with_dots {
        pattern = "/rust1.26.html",
        "/rust1.26.html" => {},
        "/rust1x26.html" => None,
    },
    param {
        pattern = "/user/:id",
        "/user/42" => { "id" => Some("42") },
        "/user/42/" => { "id" => Some("42") },
        "/USER/Ab" => { "id" => Some("Ab") },
        "/user" => None,
        "/user/" => None,
        "/user/42/posts" => None,
    },
    many_params {
        pattern = "/repos/:owner/:repo/commits/:sha",
        "/repos/rust-lang/rust/commits/a1b2c3" => {
            "owner" => Some("rust-lang"),
            "repo" => Some("rust"),
            "sha" => Some("a1b2c3"),
        },
        "/repos/rust-lang/rust/commits" => None,
    },
    optional {
        pattern = "/thing/:id?",
        "/thing" => { "id" => None },
        "/thing/" => { "id" => None },
        "/thing/5" => { "id" => Some("5") },
        "/thing/5/6" => None,
    },
    wildcard {
        pattern = "/docs/*",
        "/docs" => { "*" => None },
        "/docs/" => { "*" => None },
        "/docs/intro" => { "*" => Some("intro") },
        "/docs/guide/routing" => { "*" => Some("guide/routing") },
        "/doc" => None,
    },
    optional_wildcard {
        pattern = "/thing/*?",
        "/thing" => { "*" => None },
        "/thing/5/6" => { "*" => Some("5/6") },
    },
    named_wildcard {
        pattern = "/files/*path",
        "/files/img/logo.svg" => { "path" => Some("img/logo.svg") },
    },
    suffix {
        pattern = "/files/:name.js",
        "/files/app.js" => { "name" => Some("app") },
        "/files/app.min.js" => { "name" => Some("app.min") },
        "/files/app.JS" => { "name" => Some("app") },
        "/files/app.css" => None,
        "/files/app" => None,
    },
    optional_suffix {
        pattern = "/feed/:format.xml?",
        "/feed" => { "format" => None },
        "/feed/rss.xml" => { "format" => Some("rss") },
        "/feed/rss" => None,
    },
    declaration_order {
        pattern = "/blog/:category/page/:page?/*",
        "/blog/rust/page/2/extra/stuff" => {
            "category" => Some("rust"),
            "page" => Some("2"),
            "*" => Some("extra/stuff"),
        },
        "/blog/rust/page" => {
            "category" => Some("rust"),
            "page" => None,
            "*" => None,
        },
        "/blog/page/2" => None,
    },
}

#[test]
fn loose() {
    let pattern = Pattern::compile_loose("/api/:version").unwrap();

    assert!(pattern.is_loose());
    assert_eq!(pattern.find("/api/v1"), Some(vec![Some("v1")]));
    assert_eq!(pattern.find("/api/v1/tasks/3"), Some(vec![Some("v1")]));
    assert_eq!(pattern.find("/api"), None);
    assert_eq!(pattern.find("/apis/v1"), None);
}

#[test]
fn display() {
    let pattern = Pattern::compile("/user/:id").unwrap();
    assert_eq!(pattern.to_string(), "/user/:id");
    assert_eq!(pattern.as_str(), "/user/:id");
}

#[test]
fn errors() {
    let err = Pattern::compile("/users/{id}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected character '{' at offset 7 in route '/users/{id}'"
    );

    let err = Pattern::compile("/users/:").unwrap_err();
    assert!(matches!(err, PatternError::UnnamedParam { position: 7, .. }));

    assert!(Pattern::compile("/users?").is_err());
    assert!(Pattern::compile("/caf\u{e9}").is_err());
}
