//! Небольшое владеющее дерево XML поверх событий quick-xml.
//!
//! Исходные файлы зарплат читаются и перезаписываются целиком, поэтому
//! незнакомые элементы, атрибуты и комментарии должны пережить цикл
//! чтение → запись.

use crate::error::{xml, Result, SalaryError};
use quick_xml::{
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Заменяет значение существующего атрибута или добавляет новый в конец.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Прямые потомки с заданным именем.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// Все потомки с заданным именем в порядке документа (сам элемент не входит).
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        collect_named(self, name, &mut out);
        out
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }
}

fn collect_named<'a>(el: &'a Element, name: &str, out: &mut Vec<&'a Element>) {
    for child in el.elements() {
        if child.name == name {
            out.push(child);
        }
        collect_named(child, name, out);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Document { root }
    }

    pub fn parse(s: &str) -> Result<Document> {
        let mut reader = Reader::from_str(s);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(xml)? {
                Event::Start(e) => stack.push(start_element(&e)?),
                Event::Empty(e) => {
                    let el = start_element(&e)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| SalaryError::Xml("unexpected closing tag".into()))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(xml)?.into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(text));
                    }
                }
                Event::CData(c) => {
                    let text = String::from_utf8(c.into_inner().into_owned())
                        .map_err(|e| SalaryError::Xml(e.to_string()))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::CData(text));
                    }
                }
                Event::Comment(c) => {
                    let text = String::from_utf8(c.into_inner().into_owned())
                        .map_err(|e| SalaryError::Xml(e.to_string()))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Comment(text));
                    }
                }
                Event::Eof => break,
                // декларация, PI и DOCTYPE пишутся заново при сохранении
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(SalaryError::Xml(format!(
                "unclosed element <{}>",
                stack[stack.len() - 1].name
            )));
        }
        root.map(Document::new)
            .ok_or_else(|| SalaryError::Xml("document has no root element".into()))
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut wr = Writer::new_with_indent(Vec::new(), b' ', 2);
        wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml)?;
        write_element(&mut wr, &self.root).map_err(xml)?;
        String::from_utf8(wr.into_inner()).map_err(|e| SalaryError::Xml(e.to_string()))
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(xml)?
        .to_string();
    let mut el = Element::new(name);
    for a in e.attributes() {
        let a = a.map_err(xml)?;
        let key = std::str::from_utf8(a.key.as_ref()).map_err(xml)?.to_string();
        let value = a.unescape_value().map_err(xml)?.into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push(el),
        None if root.is_none() => *root = Some(el),
        None => return Err(SalaryError::Xml("more than one root element".into())),
    }
    Ok(())
}

fn write_element<W: std::io::Write>(
    wr: &mut Writer<W>,
    el: &Element,
) -> std::result::Result<(), quick_xml::Error> {
    let start = BytesStart::new(el.name.as_str())
        .with_attributes(el.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    if el.children.is_empty() {
        wr.write_event(Event::Empty(start))?;
        return Ok(());
    }

    wr.write_event(Event::Start(start))?;
    for child in &el.children {
        match child {
            Node::Element(e) => write_element(wr, e)?,
            Node::Text(t) => wr.write_event(Event::Text(BytesText::new(t)))?,
            Node::CData(t) => wr.write_event(Event::CData(BytesCData::new(t.as_str())))?,
            Node::Comment(t) => wr.write_event(Event::Comment(BytesText::from_escaped(t.as_str())))?,
        }
    }
    wr.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}
