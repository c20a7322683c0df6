#[cfg(test)]
pub mod test {
    use serde::Deserialize;

    use crate::schema::{Field, Primitive, Record, Reflect, Schema, TypeRef};

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct Single {
        pub other: String,
    }

    crate::record!(Single, "Single" { "other": String });

    /// One of the dynamically named sections.
    #[derive(Deserialize, Debug, PartialEq)]
    pub struct Item {
        #[serde(rename = "_name")]
        pub name: String,
        pub val: String,
    }

    crate::record!(Item, "Item" { "_name": String, "val": String });

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct Config {
        pub single: Single,
        #[serde(rename = "_many", default)]
        pub items: Vec<Item>,
    }

    crate::record!(Config, "Config" { "single": Single, "_many": Vec<Item> });

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct Wrapper {
        #[serde(rename = "_many", default)]
        pub items: Vec<Item>,
    }

    crate::record!(Wrapper, "Wrapper" { "_many": Vec<Item> });

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct WrapperConfig {
        pub wrapper: Wrapper,
    }

    crate::record!(WrapperConfig, "WrapperConfig" { "wrapper": Wrapper });

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct Foo {
        pub bar: String,
        pub pip: i64,
    }

    crate::record!(Foo, "Foo" { "bar": String, "pip": i64 });

    /// A record mixing scalars, a flat record and a collection.
    #[derive(Deserialize, Debug, PartialEq)]
    pub struct MixedWrapper {
        pub test: String,
        pub foo: Foo,
        #[serde(rename = "_many", default)]
        pub items: Vec<Item>,
    }

    crate::record!(MixedWrapper, "MixedWrapper" {
        "test": String,
        "foo": Foo,
        "_many": Vec<Item>,
    });

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct MixedConfig {
        pub wrapper: MixedWrapper,
    }

    crate::record!(MixedConfig, "MixedConfig" { "wrapper": MixedWrapper });

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct Server {
        pub host: String,
        #[serde(default = "default_port")]
        pub port: u16,
        pub motd: Option<String>,
        pub debug: Option<bool>,
        pub tls: Option<Tls>,
    }

    fn default_port() -> u16 {
        8080
    }

    crate::record!(Server, "Server" {
        "host": String,
        "port": u16 = "8080",
        "motd": Option<String>,
        "debug": Option<bool>,
        "tls": Option<Tls>,
    });

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct Tls {
        pub cert: String,
        pub key: String,
    }

    crate::record!(Tls, "Tls" { "cert": String, "key": String });

    /// Three levels deep: App -> Server -> Tls.
    #[derive(Deserialize, Debug, PartialEq)]
    pub struct App {
        pub name: String,
        pub server: Server,
    }

    crate::record!(App, "App" { "name": String, "server": Server });

    /// Declares two collections; every operation must refuse it.
    #[derive(Debug)]
    pub struct TwoMany;

    impl<'de> Deserialize<'de> for TwoMany {
        fn deserialize<D: serde::Deserializer<'de>>(_: D) -> Result<Self, D::Error> {
            Err(serde::de::Error::custom("TwoMany is never built"))
        }
    }

    const ITEMS: &TypeRef = &TypeRef::List(<Item as Reflect>::TYPE);

    impl Reflect for TwoMany {
        const TYPE: &'static TypeRef = &TypeRef::Record(<TwoMany as Record>::SCHEMA);
    }

    impl Record for TwoMany {
        const SCHEMA: &'static Schema = &Schema {
            name: "TwoMany",
            fields: &[Field::new("_many", ITEMS), Field::new("_many", ITEMS)],
        };
    }

    const PATH: &TypeRef = &TypeRef::Opaque("PathBuf");

    pub const OPAQUE_SCHEMA: &Schema = &Schema {
        name: "HasPath",
        fields: &[Field::new("path", PATH)],
    };

    // A record that contains itself: Node { label, child: Option<Node> }.
    pub static NODE: Schema = Schema {
        name: "Node",
        fields: &NODE_FIELDS,
    };
    static NODE_FIELDS: [Field; 2] = [Field::new("label", &LABEL), Field::new("child", &CHILD)];
    static LABEL: TypeRef = TypeRef::Primitive(Primitive::String);
    static CHILD: TypeRef = TypeRef::Optional(&NODE_REF);
    static NODE_REF: TypeRef = TypeRef::Record(&NODE);

    #[test]
    fn fixtures_describe_themselves() {
        assert_eq!(Config::SCHEMA.name, "Config");
        assert_eq!(Server::SCHEMA.field("port").unwrap().default, Some("8080"));
    }
}
