//! Java fixtures: trees assembled over real source text, plus JDK bindings.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use refit_ast::{NodeId, NodeKind, Slot, SourceSpan, Tree, TreeBuilder};
use refit_binding::{BindingTable, MethodBinding, TypeBinding, TypeKind};

/// Builds a tree over `source`, locating each node by the text it covers.
pub struct Fixture {
    source: String,
    builder: TreeBuilder,
    spans: HashMap<NodeId, SourceSpan>,
}

impl Fixture {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            builder: TreeBuilder::new(source.as_str()),
            source,
            spans: HashMap::new(),
        }
    }

    /// Span of the `nth` occurrence of `needle`.
    pub fn find(&self, needle: &str, nth: usize) -> SourceSpan {
        let (start, _) = self
            .source
            .match_indices(needle)
            .nth(nth)
            .unwrap_or_else(|| panic!("`{needle}` #{nth} not in `{}`", self.source));
        span(start, start + needle.len())
    }

    pub fn span(&self, id: NodeId) -> SourceSpan {
        self.spans[&id]
    }

    fn record(&mut self, id: NodeId, span: SourceSpan) -> NodeId {
        self.spans.insert(id, span);
        id
    }

    fn text(&self, span: SourceSpan) -> &str {
        &self.source[span.start as usize..span.end as usize]
    }

    /// Offset just past the next `ch` at or after `from`.
    fn past(&self, from: u32, ch: char) -> u32 {
        let offset = self.source[from as usize..]
            .find(ch)
            .unwrap_or_else(|| panic!("no `{ch}` after {from}"));
        from + offset as u32 + ch.len_utf8() as u32
    }

    pub fn name_at(&mut self, at: SourceSpan) -> NodeId {
        let id = self.builder.leaf(NodeKind::SimpleName, at).unwrap();
        self.record(id, at)
    }

    pub fn name(&mut self, needle: &str, nth: usize) -> NodeId {
        let at = self.find(needle, nth);
        self.name_at(at)
    }

    /// `Name` or `Name<Arg, ...>`, nested arguments included.
    pub fn type_at(&mut self, at: SourceSpan) -> NodeId {
        let text = self.text(at).to_string();
        let Some(open) = text.find('<') else {
            let name = self.name_at(at);
            let id = self
                .builder
                .node(NodeKind::SimpleType, at)
                .child(Slot::Name, name)
                .build()
                .unwrap();
            return self.record(id, at);
        };

        let base = self.type_at(span(at.start as usize, at.start as usize + open));
        let inner_start = at.start as usize + open + 1;
        let inner = &text[open + 1..text.len() - 1];
        let arguments: Vec<NodeId> = split_top_level(inner)
            .into_iter()
            .map(|(from, to)| self.type_at(span(inner_start + from, inner_start + to)))
            .collect();

        let id = self
            .builder
            .node(NodeKind::ParameterizedType, at)
            .child(Slot::Type, base)
            .list(Slot::TypeArguments, arguments)
            .build()
            .unwrap();
        self.record(id, at)
    }

    pub fn ty(&mut self, needle: &str, nth: usize) -> NodeId {
        let at = self.find(needle, nth);
        self.type_at(at)
    }

    /// The `nth` `new T<...>(args)` in the source, with an optional
    /// anonymous class body. Arguments must be plain names.
    pub fn creation(&mut self, nth: usize) -> NodeId {
        let source = self.source.clone();
        let bytes = source.as_bytes();
        let start = self.find("new ", nth).start as usize;

        let type_start = start + 4;
        let mut open = type_start;
        let mut depth = 0usize;
        while !(bytes[open] == b'(' && depth == 0) {
            match bytes[open] {
                b'<' => depth += 1,
                b'>' => depth -= 1,
                _ => {}
            }
            open += 1;
        }
        let close = matching(bytes, open, b'(', b')');
        let ty = self.type_at(span(type_start, open));

        let arguments: Vec<NodeId> = split_top_level(&source[open + 1..close])
            .into_iter()
            .map(|(from, to)| self.name_at(span(open + 1 + from, open + 1 + to)))
            .collect();

        let mut end = close + 1;
        let after = source[end..].trim_start();
        let anonymous = if after.starts_with('{') {
            let body_open = source.len() - after.len();
            let body_close = matching(bytes, body_open, b'{', b'}');
            end = body_close + 1;
            let body = span(body_open, end);
            let id = self
                .builder
                .node(NodeKind::AnonymousClassDeclaration, body)
                .list(Slot::BodyDeclarations, [])
                .build()
                .unwrap();
            Some(self.record(id, body))
        } else {
            None
        };

        let at = span(start, end);
        let id = self
            .builder
            .node(NodeKind::ClassInstanceCreation, at)
            .child(Slot::Type, ty)
            .list(Slot::Arguments, arguments)
            .maybe_child(Slot::AnonymousClassDeclaration, anonymous)
            .build()
            .unwrap();
        self.record(id, at)
    }

    /// `(inner)`.
    pub fn paren(&mut self, inner: NodeId) -> NodeId {
        let inner_span = self.span(inner);
        let at = SourceSpan::new(inner_span.start - 1, inner_span.end + 1);
        assert_eq!(self.text(at).as_bytes()[0], b'(');
        let id = self
            .builder
            .node(NodeKind::ParenthesizedExpression, at)
            .child(Slot::Expression, inner)
            .build()
            .unwrap();
        self.record(id, at)
    }

    pub fn fragment(&mut self, name: &str, nth: usize, initializer: Option<NodeId>) -> NodeId {
        let name = self.name(name, nth);
        let start = self.span(name).start;
        let end = initializer.map_or(self.span(name).end, |init| self.span(init).end);
        let at = SourceSpan::new(start, end);
        let id = self
            .builder
            .node(NodeKind::VariableDeclarationFragment, at)
            .child(Slot::Name, name)
            .maybe_child(Slot::Initializer, initializer)
            .build()
            .unwrap();
        self.record(id, at)
    }

    /// `Type fragment, ...;`
    pub fn declaration(&mut self, ty: NodeId, fragments: &[NodeId]) -> NodeId {
        let last = fragments.last().map_or(self.span(ty).end, |f| self.span(*f).end);
        let at = SourceSpan::new(self.span(ty).start, self.past(last, ';'));
        let id = self
            .builder
            .node(NodeKind::VariableDeclarationStatement, at)
            .child(Slot::Type, ty)
            .list(Slot::Fragments, fragments.iter().copied())
            .build()
            .unwrap();
        self.record(id, at)
    }

    /// `modifiers Type fragment, ...;` as a class member. Modifiers are not
    /// modelled; the field starts at the beginning of its line.
    pub fn field(&mut self, ty: NodeId, fragments: &[NodeId]) -> NodeId {
        let ty_start = self.span(ty).start as usize;
        let line = self.source[..ty_start].rfind('\n').map_or(0, |i| i + 1);
        let indent = self.source[line..].len() - self.source[line..].trim_start().len();
        let last = fragments.last().map_or(self.span(ty).end, |f| self.span(*f).end);
        let at = SourceSpan::new((line + indent) as u32, self.past(last, ';'));
        let id = self
            .builder
            .node(NodeKind::FieldDeclaration, at)
            .child(Slot::Type, ty)
            .list(Slot::Fragments, fragments.iter().copied())
            .build()
            .unwrap();
        self.record(id, at)
    }

    pub fn assignment(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        let at = SourceSpan::new(self.span(lhs).start, self.span(rhs).end);
        let id = self
            .builder
            .node(NodeKind::Assignment, at)
            .child(Slot::LeftHandSide, lhs)
            .child(Slot::RightHandSide, rhs)
            .build()
            .unwrap();
        self.record(id, at)
    }

    /// `expression;`
    pub fn statement(&mut self, expression: NodeId) -> NodeId {
        let inner = self.span(expression);
        let at = SourceSpan::new(inner.start, self.past(inner.end, ';'));
        let id = self
            .builder
            .node(NodeKind::ExpressionStatement, at)
            .child(Slot::Expression, expression)
            .build()
            .unwrap();
        self.record(id, at)
    }

    /// `return expression;`
    pub fn return_statement(&mut self, expression: NodeId) -> NodeId {
        let inner = self.span(expression);
        let start = self.source[..inner.start as usize].rfind("return").unwrap();
        let at = SourceSpan::new(start as u32, self.past(inner.end, ';'));
        let id = self
            .builder
            .node(NodeKind::ReturnStatement, at)
            .child(Slot::Expression, expression)
            .build()
            .unwrap();
        self.record(id, at)
    }

    /// `receiver.name(arguments)`.
    pub fn invocation(
        &mut self,
        receiver: Option<NodeId>,
        name: NodeId,
        arguments: &[NodeId],
    ) -> NodeId {
        let start = receiver.map_or(self.span(name).start, |r| self.span(r).start);
        let last = arguments.last().map_or(self.span(name).end, |a| self.span(*a).end);
        let at = SourceSpan::new(start, self.past(last, ')'));
        let id = self
            .builder
            .node(NodeKind::MethodInvocation, at)
            .maybe_child(Slot::Expression, receiver)
            .child(Slot::Name, name)
            .list(Slot::Arguments, arguments.iter().copied())
            .build()
            .unwrap();
        self.record(id, at)
    }

    /// `{ statements }`.
    pub fn block(&mut self, statements: &[NodeId]) -> NodeId {
        let first = statements.first().map(|s| self.span(*s)).unwrap();
        let last = statements.last().map(|s| self.span(*s)).unwrap();
        let start = self.source[..first.start as usize].rfind('{').unwrap();
        let at = SourceSpan::new(start as u32, self.past(last.end, '}'));
        let id = self
            .builder
            .node(NodeKind::Block, at)
            .list(Slot::Statements, statements.iter().copied())
            .build()
            .unwrap();
        self.record(id, at)
    }

    /// `ReturnType name() body`.
    pub fn method(&mut self, return_type: NodeId, name: NodeId, body: NodeId) -> NodeId {
        let at = SourceSpan::new(self.span(return_type).start, self.span(body).end);
        let id = self
            .builder
            .node(NodeKind::MethodDeclaration, at)
            .child(Slot::ReturnType, return_type)
            .child(Slot::Name, name)
            .list(Slot::Parameters, [])
            .child(Slot::Body, body)
            .build()
            .unwrap();
        self.record(id, at)
    }

    pub fn finish(self, root: NodeId) -> Tree {
        self.builder.finish(root).unwrap()
    }
}

fn span(start: usize, end: usize) -> SourceSpan {
    SourceSpan::new(start as u32, end as u32)
}

fn matching(bytes: &[u8], open: usize, left: u8, right: u8) -> usize {
    let mut depth = 0usize;
    for (offset, byte) in bytes[open..].iter().enumerate() {
        if *byte == left {
            depth += 1;
        } else if *byte == right {
            depth -= 1;
            if depth == 0 {
                return open + offset;
            }
        }
    }
    panic!("unbalanced `{}`", left as char);
}

/// Comma-separated items outside nested `<>`, as trimmed offset ranges.
fn split_top_level(text: &str) -> Vec<(usize, usize)> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut item_start = 0;
    for (offset, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                items.push((item_start, offset));
                item_start = offset + 1;
            }
            _ => {}
        }
    }
    items.push((item_start, text.len()));

    items
        .into_iter()
        .filter_map(|(from, to)| {
            let item = &text[from..to];
            let trimmed = item.trim_start();
            let from = from + (item.len() - trimmed.len());
            let to = from + trimmed.trim_end().len();
            (from < to).then_some((from, to))
        })
        .collect()
}

/// The slice of `java.*` the scenarios need.
pub struct Jdk {
    pub object: Arc<TypeBinding>,
    pub string: Arc<TypeBinding>,
    pub integer: Arc<TypeBinding>,
    pub collection: Arc<TypeBinding>,
    pub list: Arc<TypeBinding>,
    pub map: Arc<TypeBinding>,
    pub array_list: Arc<TypeBinding>,
    pub hash_map: Arc<TypeBinding>,
    /// `ArrayList()`
    pub array_list_new: Arc<MethodBinding>,
    /// `ArrayList(Collection<? extends E>)`
    pub array_list_copy: Arc<MethodBinding>,
    /// `HashMap()`
    pub hash_map_new: Arc<MethodBinding>,
    /// `HashMap(Map<? extends K, ? extends V>)`
    pub hash_map_copy: Arc<MethodBinding>,
}

impl Jdk {
    pub fn new() -> Self {
        let object = TypeBinding::class("java.lang.Object");
        let string = TypeBinding::class("java.lang.String");
        let integer = TypeBinding::class("java.lang.Integer");
        let collection = TypeBinding::generic("java.util.Collection", TypeKind::Interface, &["E"]);
        let list = TypeBinding::generic("java.util.List", TypeKind::Interface, &["E"]);
        let map = TypeBinding::generic("java.util.Map", TypeKind::Interface, &["K", "V"]);
        let array_list = TypeBinding::generic("java.util.ArrayList", TypeKind::Class, &["E"]);
        let hash_map = TypeBinding::generic("java.util.HashMap", TypeKind::Class, &["K", "V"]);

        let extends =
            |variable: &Arc<TypeBinding>| TypeBinding::wildcard(Some(Arc::clone(variable)));
        let array_list_e = &array_list.type_parameters()[0];
        let collection_of_e =
            TypeBinding::parameterize(&collection, vec![extends(array_list_e)]).unwrap();
        let hash_map_k = &hash_map.type_parameters()[0];
        let hash_map_v = &hash_map.type_parameters()[1];
        let map_of_kv =
            TypeBinding::parameterize(&map, vec![extends(hash_map_k), extends(hash_map_v)])
                .unwrap();

        Self {
            array_list_new: MethodBinding::constructor(&array_list, vec![]),
            array_list_copy: MethodBinding::constructor(&array_list, vec![collection_of_e]),
            hash_map_new: MethodBinding::constructor(&hash_map, vec![]),
            hash_map_copy: MethodBinding::constructor(&hash_map, vec![map_of_kv]),
            object,
            string,
            integer,
            collection,
            list,
            map,
            array_list,
            hash_map,
        }
    }

    pub fn of(
        &self,
        generic: &Arc<TypeBinding>,
        arguments: &[&Arc<TypeBinding>],
    ) -> Arc<TypeBinding> {
        TypeBinding::parameterize(generic, arguments.iter().map(|a| Arc::clone(a)).collect())
            .unwrap()
    }

    /// Bind `call` to `constructor` as seen through `instance`.
    pub fn bind_creation(
        &self,
        table: &mut BindingTable,
        call: NodeId,
        instance: Arc<TypeBinding>,
        constructor: &Arc<MethodBinding>,
        arguments: Vec<Arc<TypeBinding>>,
    ) {
        let substituted = MethodBinding::substituted(constructor, &instance, arguments);
        table.bind_type(call, instance).bind_constructor(call, substituted);
    }
}

impl Default for Jdk {
    fn default() -> Self {
        Self::new()
    }
}

/// `List<String> l = <initializer>;` as a sole statement, where the
/// initializer is the first creation, wrapped in `parens` parentheses.
///
/// Returns the tree, the creation's id and its bindings.
pub fn string_list_declaration(source: &str, parens: usize) -> (Tree, NodeId, BindingTable) {
    let jdk = Jdk::new();
    let mut fx = Fixture::new(source);

    let ty = fx.ty("List<String>", 0);
    let call = fx.creation(0);
    let mut initializer = call;
    for _ in 0..parens {
        initializer = fx.paren(initializer);
    }
    let fragment = fx.fragment("l", 0, Some(initializer));
    let statement = fx.declaration(ty, &[fragment]);
    let tree = fx.finish(statement);

    let mut table = BindingTable::new();
    jdk.bind_creation(
        &mut table,
        call,
        jdk.of(&jdk.array_list, &[&jdk.string]),
        &jdk.array_list_new,
        vec![],
    );
    (tree, call, table)
}

/// Install a test subscriber so `RUST_LOG=refit_engine=trace` shows engine
/// logs for a failing test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
