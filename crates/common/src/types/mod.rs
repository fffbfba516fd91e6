use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Serialize, Debug)]
pub struct Version {
    pub name: &'static str,
    pub version: &'static str,
}
