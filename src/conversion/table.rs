//! Bundled simplified to traditional character table.
//!
//! Covers characters whose traditional form is unambiguous in ordinary
//! narration. One-to-many characters (干 后 里 面 只 系 台 准 几 冲 复 钟 松
//! 制 表 and the like) are not listed. No traditional form is itself a key.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Pairs of equal-length strings: simplified characters and their traditional forms
pub(crate) const PAIRS: &[(&str, &str)] = &[
    ("这个们来说时会为国学", "這個們來說時會為國學"),
    ("对长开关发经现过还进", "對長開關發經現過還進"),
    ("动种样点从问题应实间", "動種樣點從問題應實間"),
    ("东车见门马鸟鱼书语话", "東車見門馬鳥魚書語話"),
    ("让认识读写听讲请谢诉", "讓認識讀寫聽講請謝訴"),
    ("记论设计议许试该谁调", "記論設計議許試該誰調"),
    ("课译词证评质贝买卖费", "課譯詞證評質貝買賣費"),
    ("贵资财货负责贴败员圆", "貴資財貨負責貼敗員圓"),
    ("园图团传专转轮软较辆", "園圖團傳專轉輪軟較輛"),
    ("输边达运远选递连迟适", "輸邊達運遠選遞連遲適"),
    ("导层属岁战厅厂广庆废", "導層屬歲戰廳廠廣慶廢"),
    ("异张弹强归当录忆态总", "異張彈強歸當錄憶態總"),
    ("恶爱扫护报担拥择换挤", "惡愛掃護報擔擁擇換擠"),
    ("损据构杂权杀条极标树", "損據構雜權殺條極標樹"),
    ("档桥检楼气汉汤沟没沪", "檔橋檢樓氣漢湯溝沒滬"),
    ("泪洁浅测济浓涛润涨渐", "淚潔淺測濟濃濤潤漲漸"),
    ("温湾满滚灯灵炼烟热焕", "溫灣滿滾燈靈煉煙熱煥"),
    ("爷牵犹独狮环电画畅疗", "爺牽猶獨獅環電畫暢療"),
    ("盘码确礼祷离称税稳穷", "盤碼確禮禱離稱稅穩窮"),
    ("竞笔篮类紧红约级纪纯", "競筆籃類緊紅約級紀純"),
    ("纸纷线练组细终织结绍", "紙紛線練組細終織結紹"),
    ("给络绝统继绩续维综绿", "給絡絕統繼績續維綜綠"),
    ("编缘网罗职联聪肃胜脑", "編緣網羅職聯聰肅勝腦"),
    ("脚脸节苏荣药莱获营萝", "腳臉節蘇榮藥萊獲營蘿"),
    ("蓝虑虽补装观视览觉订", "藍慮雖補裝觀視覽覺訂"),
    ("训访诗诚误谈谋谓贡账", "訓訪詩誠誤談謀謂貢賬"),
    ("购贸赛赶趋跃践踪轻载", "購貿賽趕趨躍踐蹤輕載"),
    ("辑辞迈违释钱铁银链锁", "輯辭邁違釋錢鐵銀鏈鎖"),
    ("错键镜闻阅队阳阴阶际", "錯鍵鏡聞閱隊陽陰階際"),
    ("陆陈险随隐难雾页顶项", "陸陳險隨隱難霧頁頂項"),
    ("顺预领频颜风飞饭饮饰", "順預領頻顏風飛飯飲飾"),
    ("馆驾验骑鲜鸡麦黄齐龙", "館駕驗騎鮮雞麥黃齊龍"),
    ("龟义乐习乡乱争亏亚产", "龜義樂習鄉亂爭虧亞產"),
    ("亲亿仅仓仪价众优伤伦", "親億僅倉儀價眾優傷倫"),
    ("体侠侧侨俭债倾偿储儿", "體俠側僑儉債傾償儲兒"),
    ("兑兰兴养兽内册军农冯", "兌蘭興養獸內冊軍農馮"),
    ("况冻净减凤凭击则刚创", "況凍淨減鳳憑擊則剛創"),
    ("删别刘剧剑办务劳势勋", "刪別劉劇劍辦務勞勢勳"),
    ("区医华协单卢卫却压厕", "區醫華協單盧衛卻壓廁"),
    ("厌县参双变叙叶号叹吗", "厭縣參雙變敘葉號嘆嗎"),
    ("启吴呜响哑唤嘱围圣场", "啟吳嗚響啞喚囑圍聖場"),
    ("坏块坚坝垒垦执墙壮声", "壞塊堅壩壘墾執牆壯聲"),
    ("壶处备头夹夺奋奖妇妈", "壺處備頭夾奪奮獎婦媽"),
    ("娱婴孙宝宠审宪宽宾寻", "娛嬰孫寶寵審憲寬賓尋"),
    ("寿将尔尘尝岛岭峡币师", "壽將爾塵嘗島嶺峽幣師"),
    ("帐带帮庄库庙弃弯彻径", "帳帶幫莊庫廟棄彎徹徑"),
    ("忧怀怜恋恳恼惊惧惨惯", "憂懷憐戀懇惱驚懼慘慣"),
    ("愤戏扩扰扬抢拟拣挥挡", "憤戲擴擾揚搶擬揀揮擋"),
    ("挣捡掷揽搀摄摆摇撑敌", "掙撿擲攬攙攝擺搖撐敵"),
    ("数斋断无旧显晋晒晓暂", "數齋斷無舊顯晉曬曉暫"),
    ("杨枪栏梦欢欧残毕毙沧", "楊槍欄夢歡歐殘畢斃滄"),
    ("泽洒浊浏浑涡涩渊渔渗", "澤灑濁瀏渾渦澀淵漁滲"),
    ("湿溃滞滤滥潜灭灾炉烂", "濕潰滯濾濫潛滅災爐爛"),
    ("烦烧烫牍犊状狭狱猎猫", "煩燒燙牘犢狀狹獄獵貓"),
    ("献玛琐畴疯疮瘾盏盐监", "獻瑪瑣疇瘋瘡癮盞鹽監"),
    ("盖睁矿砖础硕碍祸禅秃", "蓋睜礦磚礎碩礙禍禪禿"),
    ("积窃竖笼筹签简粮纠纬", "積竊豎籠籌簽簡糧糾緯"),
    ("纲纳纵纹纺绑绒绕绘绣", "綱納縱紋紡綁絨繞繪繡"),
    ("绪绳绵缓缝缩缴罚罢羡", "緒繩綿緩縫縮繳罰罷羨"),
    ("翘耸耻聋肠肤肿胀胆胶", "翹聳恥聾腸膚腫脹膽膠"),
    ("腾舰舱艰艺芦苍苹荐荡", "騰艦艙艱藝蘆蒼蘋薦蕩"),
    ("莲萨蒋蔼虏虫虾蚀蚁蛮", "蓮薩蔣藹虜蟲蝦蝕蟻蠻"),
    ("衅袭裤规觅誉讨讯讶讽", "釁襲褲規覓譽討訊訝諷"),
    ("诈诊诞询详诱诸诺谅谊", "詐診誕詢詳誘諸諾諒誼"),
    ("谎谜谣谦谨谱贞贤贩贪", "謊謎謠謙謹譜貞賢販貪"),
    ("贫贯贱贷贺赌赏赔赖赚", "貧貫賤貸賀賭賞賠賴賺"),
    ("赠踊躯轨轩轰轴轿辅辈", "贈踴軀軌軒轟軸轎輔輩"),
    ("辉辖辩辽迁迹逊逻遗邓", "輝轄辯遼遷跡遜邏遺鄧"),
    ("邮邻郑酝酱针钓钢钥钩", "郵鄰鄭醞醬針釣鋼鑰鉤"),
    ("铃铅铜铭铺销锅锋锡锦", "鈴鉛銅銘鋪銷鍋鋒錫錦"),
    ("锻镇闪闭闯闲闷闹阀阐", "鍛鎮閃閉闖閒悶鬧閥闡"),
    ("阵陕隶雏雳靓韩顾顿颁", "陣陝隸雛靂靚韓顧頓頒"),
    ("颂颇颗额飘饱饲饺饼驰", "頌頗顆額飄飽飼餃餅馳"),
    ("驱驳驻驶骂骄骗骚鲁鲸", "驅駁駐駛罵驕騙騷魯鯨"),
    ("鸭鸿鹅鹰龄", "鴨鴻鵝鷹齡"),
];

/// Character lookup built from `PAIRS`
pub(crate) static TABLE: Lazy<HashMap<char, char>> = Lazy::new(|| {
    PAIRS
        .iter()
        .flat_map(|(simplified, traditional)| simplified.chars().zip(traditional.chars()))
        .collect()
});

/// Traditional form of `c`, or `c` itself when unmapped
pub fn lookup(c: char) -> char {
    TABLE.get(&c).copied().unwrap_or(c)
}
