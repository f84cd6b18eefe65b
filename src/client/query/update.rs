//! Update query: add and delete documents

use super::{Query, QueryType, ResponseHeader};
use crate::client::request::Request;
use crate::error::{Error, Result};
use serde::Deserialize;

/// Document to index: ordered field name to values
pub type Document = Vec<(String, Vec<String>)>;

#[derive(Debug, Clone)]
enum Command {
    Add(Vec<Document>),
    DeleteById(Vec<String>),
    DeleteByQuery(String),
    Commit,
    Optimize,
}

/// Update query posted as XML to the `update` handler
#[derive(Debug, Clone, Default)]
pub struct UpdateQuery {
    commands: Vec<Command>,
}

impl UpdateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single document
    pub fn add_document<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let doc = fields
            .into_iter()
            .map(|(k, v)| (k.into(), vec![v.into()]))
            .collect();
        self.commands.push(Command::Add(vec![doc]));
        self
    }

    /// Add several prepared documents in one `<add>` block
    pub fn add_documents(mut self, docs: Vec<Document>) -> Self {
        self.commands.push(Command::Add(docs));
        self
    }

    pub fn delete_by_id(mut self, id: impl Into<String>) -> Self {
        self.commands.push(Command::DeleteById(vec![id.into()]));
        self
    }

    pub fn delete_by_query(mut self, query: impl Into<String>) -> Self {
        self.commands.push(Command::DeleteByQuery(query.into()));
        self
    }

    pub fn commit(mut self) -> Self {
        self.commands.push(Command::Commit);
        self
    }

    pub fn optimize(mut self) -> Self {
        self.commands.push(Command::Optimize);
        self
    }

    fn render(&self) -> String {
        let mut xml = String::from("<update>");

        for command in &self.commands {
            match command {
                Command::Add(docs) => {
                    xml.push_str("<add>");
                    for doc in docs {
                        xml.push_str("<doc>");
                        for (name, values) in doc {
                            for value in values {
                                xml.push_str(&format!(
                                    "<field name=\"{}\">{}</field>",
                                    escape_xml(name),
                                    escape_xml(value)
                                ));
                            }
                        }
                        xml.push_str("</doc>");
                    }
                    xml.push_str("</add>");
                }
                Command::DeleteById(ids) => {
                    xml.push_str("<delete>");
                    for id in ids {
                        xml.push_str(&format!("<id>{}</id>", escape_xml(id)));
                    }
                    xml.push_str("</delete>");
                }
                Command::DeleteByQuery(query) => {
                    xml.push_str(&format!(
                        "<delete><query>{}</query></delete>",
                        escape_xml(query)
                    ));
                }
                Command::Commit => xml.push_str("<commit/>"),
                Command::Optimize => xml.push_str("<optimize/>"),
            }
        }

        xml.push_str("</update>");
        xml
    }
}

impl Query for UpdateQuery {
    fn query_type(&self) -> QueryType {
        QueryType::Update
    }

    fn handler(&self) -> &str {
        "update"
    }

    fn build_request(&self) -> Result<Request> {
        if self.commands.is_empty() {
            return Err(Error::InvalidQuery {
                message: "update query has no commands".to_string(),
            });
        }

        Ok(Request::post(self.handler())
            .param("wt", "json")
            .header("Content-Type: text/xml; charset=utf-8")
            .raw_data(self.render()))
    }
}

/// Decoded update response
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResult {
    #[serde(rename = "responseHeader", default)]
    pub header: ResponseHeader,
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
